//! One editing session: the card, how it is presented, and where the
//! extraction call stands. All mutation goes through the methods here.

use serde::Serialize;

use crate::error::{EditError, ExtractionError, SessionError, UploadError};
use crate::extract::{CardUpdate, Extractor};
use crate::images::data_uri_from_upload;
use crate::{CardData, GradientTheme, PresentationChoice, MAX_FONT_SIZE_PX, MIN_FONT_SIZE_PX};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionState {
    #[default]
    Idle,
    InFlight { url: String },
    Succeeded,
    /// Holds the localized message shown to the user.
    Failed { error: String },
}

/// A single user edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Title(String),
    ImageUrl(String),
    LogoUrl(String),
    Date(String),
    Source(String),
    Theme(GradientTheme),
    /// Raw text from the font size input; see [`parse_font_size`].
    FontSize(String),
}

impl Edit {
    /// Builds an edit from a field name as used in the JSON API.
    pub fn parse(field: &str, value: &str) -> Result<Edit, EditError> {
        let value = value.to_string();
        Ok(match field {
            "title" => Edit::Title(value),
            "imageUrl" => Edit::ImageUrl(value),
            "logoUrl" => Edit::LogoUrl(value),
            "date" => Edit::Date(value),
            "source" => Edit::Source(value),
            "gradientTheme" => Edit::Theme(value.parse()?),
            "fontSizePx" => Edit::FontSize(value),
            other => return Err(EditError::UnknownField(other.to_string())),
        })
    }
}

/// Whole numbers only, clamped into the supported range.
pub fn parse_font_size(input: &str) -> Result<u32, EditError> {
    let value: i64 = input
        .trim()
        .parse()
        .map_err(|_| EditError::InvalidFontSize(input.to_string()))?;
    Ok(value.clamp(MIN_FONT_SIZE_PX as i64, MAX_FONT_SIZE_PX as i64) as u32)
}

/// What became of an extraction once it finished.
#[derive(Debug)]
pub enum ExtractionOutcome {
    /// Empty URL: nothing requested, nothing changed.
    Skipped,
    Applied,
    /// Card untouched; the error is kept for logging.
    Failed(ExtractionError),
    /// The session was no longer waiting for this result.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub card: CardData,
    pub presentation: PresentationChoice,
    pub extraction: ExtractionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_extracting(&self) -> bool {
        matches!(self.extraction, ExtractionState::InFlight { .. })
    }

    pub fn apply(&mut self, edit: Edit) -> Result<(), EditError> {
        match edit {
            Edit::Title(v) => self.card.title = v,
            Edit::ImageUrl(v) => self.card.image_url = v,
            Edit::LogoUrl(v) => self.card.logo_url = v,
            Edit::Date(v) => self.card.date = v,
            Edit::Source(v) => self.card.source = v,
            Edit::Theme(theme) => self.presentation.gradient_theme = theme,
            Edit::FontSize(raw) => self.presentation.font_size_px = parse_font_size(&raw)?,
        }
        Ok(())
    }

    /// Applies every edit or none of them.
    pub fn apply_all(&mut self, edits: impl IntoIterator<Item = Edit>) -> Result<(), EditError> {
        let mut next = self.clone();
        for edit in edits {
            next.apply(edit)?;
        }
        *self = next;
        Ok(())
    }

    pub fn upload_image(&mut self, bytes: &[u8]) -> Result<(), UploadError> {
        self.card.image_url = data_uri_from_upload(bytes)?;
        Ok(())
    }

    pub fn upload_logo(&mut self, bytes: &[u8]) -> Result<(), UploadError> {
        self.card.logo_url = data_uri_from_upload(bytes)?;
        Ok(())
    }

    /// Back to defaults. An extraction in flight stays in flight.
    pub fn reset(&mut self) {
        self.card = CardData::default();
        self.presentation = PresentationChoice::default();
    }

    /// Marks an extraction as started. Returns the URL to request, or
    /// `None` when the URL is empty and nothing should happen.
    pub fn begin_extraction(&mut self, url: &str) -> Result<Option<String>, SessionError> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(None);
        }
        if self.is_extracting() {
            return Err(SessionError::ExtractionInFlight);
        }
        self.extraction = ExtractionState::InFlight {
            url: url.to_string(),
        };
        Ok(Some(url.to_string()))
    }

    /// Records the result of the call started by [`Session::begin_extraction`].
    /// The card changes only on success, and then all at once.
    pub fn finish_extraction(&mut self, result: Result<CardUpdate, ExtractionError>) -> ExtractionOutcome {
        if !self.is_extracting() {
            tracing::warn!("extraction result arrived with no extraction in flight, discarding");
            return ExtractionOutcome::Discarded;
        }
        match result {
            Ok(update) => {
                update.apply_to(&mut self.card);
                self.extraction = ExtractionState::Succeeded;
                ExtractionOutcome::Applied
            }
            Err(err) => {
                self.extraction = ExtractionState::Failed {
                    error: err.user_message().to_string(),
                };
                ExtractionOutcome::Failed(err)
            }
        }
    }

    /// Begin, call, finish, for callers that own the session exclusively.
    pub async fn extract(&mut self, extractor: &Extractor, url: &str) -> Result<ExtractionOutcome, SessionError> {
        let Some(url) = self.begin_extraction(url)? else {
            return Ok(ExtractionOutcome::Skipped);
        };
        let result = extractor.extract(&url).await;
        Ok(self.finish_extraction(result))
    }
}
