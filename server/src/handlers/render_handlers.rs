use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use photocard_cli::render::render_preview;

use crate::state::AppState;

async fn current_svg(state: &AppState) -> String {
    let session = state.snapshot().await;
    render_preview(&state.resolver, &session.card, &session.presentation).await
}

/// GET /api/preview.svg
pub async fn preview(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "image/svg+xml; charset=utf-8")],
        current_svg(&state).await,
    )
}

/// POST /api/export
///
/// Failures are logged and answered with a bare 500; there is nothing the
/// user can do about them.
pub async fn export(State(state): State<AppState>) -> Response {
    let svg = current_svg(&state).await;
    match state.exporter.export_png(svg).await {
        Ok(png) => (
            [
                (header::CONTENT_TYPE, "image/png".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", png.filename),
                ),
            ],
            png.bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
