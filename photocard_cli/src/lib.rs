pub mod ai;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod images;
pub mod locale;
pub mod page;
pub mod render;
pub mod session;
pub mod utils;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generic image used whenever no article image is known.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/600x400/png?text=No+Image";

pub const DEFAULT_FONT_SIZE_PX: u32 = 28;
pub const MIN_FONT_SIZE_PX: u32 = 8;
pub const MAX_FONT_SIZE_PX: u32 = 96;

/// Content of a card. Every field always holds some string.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub title: String,
    /// Remote URL or `data:` URI.
    pub image_url: String,
    /// Empty means the built-in logo glyph.
    pub logo_url: String,
    pub date: String,
    pub source: String,
}

impl Default for CardData {
    fn default() -> Self {
        Self {
            title: locale::PLACEHOLDER_TITLE.to_string(),
            image_url: PLACEHOLDER_IMAGE_URL.to_string(),
            logo_url: String::new(),
            date: locale::today_bn(),
            source: locale::PLACEHOLDER_SOURCE.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresentationChoice {
    pub gradient_theme: GradientTheme,
    pub font_size_px: u32,
}

impl Default for PresentationChoice {
    fn default() -> Self {
        Self {
            gradient_theme: GradientTheme::default(),
            font_size_px: DEFAULT_FONT_SIZE_PX,
        }
    }
}

/// The five preset card backgrounds.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum GradientTheme {
    #[default]
    Crimson,
    Ocean,
    Emerald,
    Sunset,
    Midnight,
}

impl GradientTheme {
    pub const ALL: [GradientTheme; 5] = [
        GradientTheme::Crimson,
        GradientTheme::Ocean,
        GradientTheme::Emerald,
        GradientTheme::Sunset,
        GradientTheme::Midnight,
    ];

    pub fn id(self) -> &'static str {
        match self {
            GradientTheme::Crimson => "crimson",
            GradientTheme::Ocean => "ocean",
            GradientTheme::Emerald => "emerald",
            GradientTheme::Sunset => "sunset",
            GradientTheme::Midnight => "midnight",
        }
    }

    /// Start and end colors of the diagonal gradient.
    pub fn stops(self) -> (&'static str, &'static str) {
        match self {
            GradientTheme::Crimson => ("#7f1d1d", "#dc2626"),
            GradientTheme::Ocean => ("#0c4a6e", "#0284c7"),
            GradientTheme::Emerald => ("#064e3b", "#059669"),
            GradientTheme::Sunset => ("#9a3412", "#f59e0b"),
            GradientTheme::Midnight => ("#0f172a", "#334155"),
        }
    }
}

impl fmt::Display for GradientTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gradient theme: {0}")]
pub struct UnknownTheme(pub String);

impl FromStr for GradientTheme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        GradientTheme::ALL
            .into_iter()
            .find(|theme| theme.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_populate_every_field() {
        let card = CardData::default();
        assert_eq!(card.title, locale::PLACEHOLDER_TITLE);
        assert_eq!(card.image_url, PLACEHOLDER_IMAGE_URL);
        assert!(card.logo_url.is_empty());
        assert_eq!(card.date, locale::today_bn());
        assert_eq!(card.source, locale::PLACEHOLDER_SOURCE);
    }

    #[test]
    fn default_theme_is_first_preset() {
        assert_eq!(PresentationChoice::default().gradient_theme, GradientTheme::ALL[0]);
        assert_eq!(PresentationChoice::default().font_size_px, DEFAULT_FONT_SIZE_PX);
    }

    #[test]
    fn theme_ids_round_trip_through_from_str() {
        for theme in GradientTheme::ALL {
            assert_eq!(theme.id().parse::<GradientTheme>().unwrap(), theme);
        }
        assert_eq!(" Ocean ".parse::<GradientTheme>().unwrap(), GradientTheme::Ocean);
        assert!("rainbow".parse::<GradientTheme>().is_err());
    }

    #[test]
    fn card_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(CardData::default()).unwrap();
        assert!(value.get("imageUrl").is_some());
        assert!(value.get("logoUrl").is_some());
    }
}
