use axum::{extract::State, http::StatusCode, Json};
use photocard_cli::session::{ExtractionOutcome, ExtractionState};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{reject, ApiError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ExtractPayload {
    pub url: String,
}

/// POST /api/extract
///
/// Empty URL: 200 and nothing happens. Already extracting: 409. Otherwise
/// the call runs in the background and this answers 202 right away; poll
/// `GET /api/extract` for the result.
pub async fn start_extraction(
    State(state): State<AppState>,
    Json(payload): Json<ExtractPayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    // 1) Mark in flight under the lock, then let go of it
    let url = {
        let mut session = state.session.write().await;
        match session.begin_extraction(&payload.url) {
            Ok(Some(url)) => url,
            Ok(None) => {
                return Ok((StatusCode::OK, Json(json!(session.extraction))));
            }
            Err(e) => return Err(reject(StatusCode::CONFLICT, e)),
        }
    };

    // 2) Provider call in the background
    let accepted = ExtractionState::InFlight { url: url.clone() };
    let session = state.session.clone();
    let extractor = state.extractor.clone();
    tokio::spawn(async move {
        let result = extractor.extract(&url).await;

        // 3) Success or failure lands in one step
        let outcome = session.write().await.finish_extraction(result);
        match outcome {
            ExtractionOutcome::Applied => tracing::info!(%url, "card filled from article"),
            ExtractionOutcome::Failed(e) => tracing::warn!(%url, error = %e, "extraction failed, card left unchanged"),
            ExtractionOutcome::Skipped | ExtractionOutcome::Discarded => {}
        }
    });

    Ok((StatusCode::ACCEPTED, Json(json!(accepted))))
}

/// GET /api/extract
pub async fn poll_extraction(State(state): State<AppState>) -> Json<ExtractionState> {
    Json(state.session.read().await.extraction.clone())
}
