use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes::{card::card_routes, extract::extract_routes};
use crate::state::AppState;

/// Only `client_url` may call the API when given; anyone otherwise.
pub fn cors(client_url: Option<&str>) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_DISPOSITION]);

    Ok(match client_url {
        Some(url) => cors.allow_origin(
            url.parse::<HeaderValue>()
                .with_context(|| format!("CLIENT_URL is not a valid origin: {url}"))?,
        ),
        None => cors.allow_origin(Any),
    })
}

pub fn app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api", card_routes(state.clone()).merge(extract_routes(state)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
