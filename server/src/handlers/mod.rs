pub mod card_handlers;
pub mod render_handlers;
pub mod service_handler;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

pub type ApiError = (StatusCode, Json<Value>);

pub fn reject(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    (status, Json(json!({ "message": message.to_string() })))
}
