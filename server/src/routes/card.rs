use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use photocard_cli::images::MAX_IMAGE_BYTES;

use crate::handlers::card_handlers::{get_card, list_themes, reset_card, update_card, upload_image, upload_logo};
use crate::handlers::render_handlers::{export, preview};
use crate::state::AppState;

pub fn card_routes(state: AppState) -> Router {
    Router::new()
        .route("/card", get(get_card).post(update_card))
        .route("/card/image", post(upload_image))
        .route("/card/logo", post(upload_logo))
        .route("/card/reset", post(reset_card))
        .route("/themes", get(list_themes))
        .route("/preview.svg", get(preview))
        .route("/export", post(export))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
        .with_state(state)
}
