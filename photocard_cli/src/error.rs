//! Error types for extraction, editing and export

use thiserror::Error;

use crate::{locale, UnknownTheme};

/// Everything that can go wrong while turning a URL into card data.
///
/// Callers show [`ExtractionError::user_message`] to the user no matter the
/// variant; the variant itself only goes to the logs.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No provider credential configured
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    /// Transport-level failure talking to the provider
    #[error("request to extraction provider failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("extraction provider answered {status}: {body}")]
    Provider { status: u16, body: String },

    /// Provider answered without any text candidate
    #[error("extraction provider returned no content")]
    EmptyResponse,

    /// Candidate text was not the expected JSON object
    #[error("extraction response is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// The input URL could not be parsed when a hostname was needed
    #[error("invalid article URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ExtractionError {
    pub fn user_message(&self) -> &'static str {
        locale::EXTRACTION_FAILED
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("an extraction is already in flight")]
    ExtractionInFlight,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EditError {
    #[error("font size must be a whole number, got {0:?}")]
    InvalidFontSize(String),

    #[error(transparent)]
    UnknownTheme(#[from] UnknownTheme),

    #[error("unknown card field: {0}")]
    UnknownField(String),

    #[error("value for {field} must be text")]
    InvalidValue { field: String },
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("uploaded file is not a recognized image")]
    NotAnImage,

    #[error("failed to read uploaded file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("card composition is not valid SVG: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("rasterization task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}
