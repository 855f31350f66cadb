use axum::{routing::post, Router};

use crate::handlers::service_handler::{poll_extraction, start_extraction};
use crate::state::AppState;

pub fn extract_routes(state: AppState) -> Router {
    Router::new()
        .route("/extract", post(start_extraction).get(poll_extraction))
        .with_state(state)
}
