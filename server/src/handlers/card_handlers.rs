use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use photocard_cli::{
    error::EditError,
    session::{Edit, Session},
    GradientTheme,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{reject, ApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FieldEdit {
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCardPayload {
    pub edits: Vec<FieldEdit>,
}

#[derive(Serialize)]
pub struct ThemeInfo {
    pub id: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

impl TryFrom<FieldEdit> for Edit {
    type Error = EditError;

    fn try_from(edit: FieldEdit) -> Result<Self, Self::Error> {
        // Form inputs arrive as text, but numbers are accepted for the font size.
        let value = match edit.value {
            Value::String(s) => s,
            Value::Number(n) if edit.field == "fontSizePx" => n.to_string(),
            _ => return Err(EditError::InvalidValue { field: edit.field }),
        };
        Edit::parse(&edit.field, &value)
    }
}

pub async fn get_card(State(state): State<AppState>) -> Json<Session> {
    Json(state.snapshot().await)
}

/// POST /api/card: all edits apply, or none do.
pub async fn update_card(
    State(state): State<AppState>,
    Json(payload): Json<UpdateCardPayload>,
) -> Result<Json<Session>, ApiError> {
    let edits = payload
        .edits
        .into_iter()
        .map(Edit::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| reject(StatusCode::BAD_REQUEST, e))?;

    let mut session = state.session.write().await;
    session
        .apply_all(edits)
        .map_err(|e| reject(StatusCode::BAD_REQUEST, e))?;
    Ok(Json(session.clone()))
}

pub async fn upload_image(State(state): State<AppState>, body: Bytes) -> Result<Json<Session>, ApiError> {
    let mut session = state.session.write().await;
    session
        .upload_image(&body)
        .map_err(|e| reject(StatusCode::BAD_REQUEST, e))?;
    tracing::info!(size = body.len(), "hero image uploaded");
    Ok(Json(session.clone()))
}

pub async fn upload_logo(State(state): State<AppState>, body: Bytes) -> Result<Json<Session>, ApiError> {
    let mut session = state.session.write().await;
    session
        .upload_logo(&body)
        .map_err(|e| reject(StatusCode::BAD_REQUEST, e))?;
    tracing::info!(size = body.len(), "logo uploaded");
    Ok(Json(session.clone()))
}

pub async fn reset_card(State(state): State<AppState>) -> Json<Session> {
    let mut session = state.session.write().await;
    session.reset();
    Json(session.clone())
}

pub async fn list_themes() -> impl IntoResponse {
    let themes: Vec<ThemeInfo> = GradientTheme::ALL
        .into_iter()
        .map(|theme| {
            let (from, to) = theme.stops();
            ThemeInfo {
                id: theme.id(),
                from,
                to,
            }
        })
        .collect();
    Json(themes)
}
