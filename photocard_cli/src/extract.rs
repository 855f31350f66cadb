//! Turns a provider answer into a complete, display-ready card update.
//!
//! Nothing here touches a [`crate::session::Session`]: the extractor builds a
//! [`CardUpdate`] off to the side and the session applies it in one step, so
//! a failure can never leave half-written card data behind.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

use crate::ai::ExtractionProvider;
use crate::error::ExtractionError;
use crate::page::PageFetcher;
use crate::{locale, CardData, PLACEHOLDER_IMAGE_URL};

/// Provider answer as parsed, before fallbacks. Any field may be absent.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedArticle {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub date: Option<String>,
    pub source: Option<String>,
}

/// The four card fields an extraction always writes. `logo_url` is never touched.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardUpdate {
    pub title: String,
    pub image_url: String,
    pub date: String,
    pub source: String,
}

impl CardUpdate {
    pub fn apply_to(self, card: &mut CardData) {
        card.title = self.title;
        card.image_url = self.image_url;
        card.date = self.date;
        card.source = self.source;
    }
}

pub fn parse_response(raw: &str) -> Result<ExtractedArticle, ExtractionError> {
    Ok(serde_json::from_str(raw.trim())?)
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}

fn hostname(input_url: &str) -> Result<String, ExtractionError> {
    let invalid = |reason: String| ExtractionError::InvalidUrl {
        url: input_url.to_string(),
        reason,
    };
    let parsed = Url::parse(input_url.trim()).map_err(|e| invalid(e.to_string()))?;
    parsed
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| invalid("URL has no host".to_string()))
}

/// Applies the fallback policy: present fields verbatim, missing ones
/// replaced. The hostname is only derived when `source` is missing.
pub fn reconcile(
    article: ExtractedArticle,
    input_url: &str,
    today: NaiveDate,
) -> Result<CardUpdate, ExtractionError> {
    let source = match present(article.source) {
        Some(source) => source,
        None => hostname(input_url)?,
    };

    Ok(CardUpdate {
        title: present(article.title).unwrap_or_else(|| locale::TITLE_NOT_FOUND.to_string()),
        image_url: present(article.image_url).unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
        date: present(article.date).unwrap_or_else(|| locale::format_bn_date(today)),
        source,
    })
}

/// Provider call plus optional page digest, producing a [`CardUpdate`].
#[derive(Clone)]
pub struct Extractor {
    provider: Arc<dyn ExtractionProvider>,
    pages: Option<Arc<PageFetcher>>,
}

impl Extractor {
    pub fn new(provider: Arc<dyn ExtractionProvider>) -> Self {
        Self {
            provider,
            pages: None,
        }
    }

    /// Fetch the article page first and hand its digest to the provider.
    pub fn with_page_fetcher(mut self, pages: PageFetcher) -> Self {
        self.pages = Some(Arc::new(pages));
        self
    }

    pub async fn extract(&self, url: &str) -> Result<CardUpdate, ExtractionError> {
        self.extract_on(url, locale::today()).await
    }

    /// Same as [`Extractor::extract`] with an explicit "today" for the date fallback.
    pub async fn extract_on(&self, url: &str, today: NaiveDate) -> Result<CardUpdate, ExtractionError> {
        let page = match &self.pages {
            Some(pages) => match pages.fetch(url).await {
                Ok(digest) => Some(digest),
                Err(e) => {
                    tracing::warn!(url, error = %e, "article page unavailable, asking provider with URL only");
                    None
                }
            },
            None => None,
        };

        let raw = self.provider.extract(url, page.as_ref()).await?;
        let article = parse_response(&raw)?;
        reconcile(article, url, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn present_fields_are_used_verbatim() {
        let article = ExtractedArticle {
            title: Some(" শিরোনাম ".into()),
            image_url: Some("https://x/y.jpg".into()),
            date: Some("১৮ অক্টোবর".into()),
            source: Some("x.com".into()),
        };
        let update = reconcile(article, "https://news.test/a", today()).unwrap();
        assert_eq!(update.title, " শিরোনাম ");
        assert_eq!(update.image_url, "https://x/y.jpg");
        assert_eq!(update.date, "১৮ অক্টোবর");
        assert_eq!(update.source, "x.com");
    }

    #[test]
    fn every_missing_field_gets_its_fallback() {
        let update =
            reconcile(ExtractedArticle::default(), "https://www.daily.test/news/1", today()).unwrap();
        assert_eq!(update.title, locale::TITLE_NOT_FOUND);
        assert_eq!(update.image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(update.date, "১৯ অক্টোবর, ২০২৬");
        assert_eq!(update.source, "www.daily.test");
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let article = ExtractedArticle {
            title: Some(String::new()),
            image_url: Some("   ".into()),
            date: Some(String::new()),
            source: Some(String::new()),
        };
        let update = reconcile(article, "https://daily.test", today()).unwrap();
        assert_eq!(update.title, locale::TITLE_NOT_FOUND);
        assert_eq!(update.image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(update.source, "daily.test");
    }

    #[test]
    fn bad_url_only_fails_when_hostname_is_needed() {
        let with_source = ExtractedArticle {
            source: Some("x.com".into()),
            ..Default::default()
        };
        assert!(reconcile(with_source, "not a url", today()).is_ok());

        let err = reconcile(ExtractedArticle::default(), "not a url", today()).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidUrl { .. }));
    }

    #[test]
    fn null_fields_parse_as_missing() {
        let article = parse_response(r#"{"title":null,"imageUrl":"https://x/y.jpg"}"#).unwrap();
        assert!(article.title.is_none());
        assert_eq!(article.image_url.as_deref(), Some("https://x/y.jpg"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_response("title: nope"),
            Err(ExtractionError::MalformedJson(_))
        ));
    }

    #[test]
    fn update_leaves_logo_alone() {
        let mut card = CardData {
            logo_url: "data:image/png;base64,AAAA".into(),
            ..CardData::default()
        };
        CardUpdate {
            title: "t".into(),
            image_url: "i".into(),
            date: "d".into(),
            source: "s".into(),
        }
        .apply_to(&mut card);
        assert_eq!(card.title, "t");
        assert_eq!(card.logo_url, "data:image/png;base64,AAAA");
    }
}
