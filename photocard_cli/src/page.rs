use reqwest::Client;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const MAX_PARAGRAPHS: usize = 6;
const DEFAULT_MAX_CONTENT_LENGTH: usize = 4_000;

/// What the article page itself says about the article, handed to the
/// provider as context.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PageDigest {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub published_at: Option<String>,
    pub site_name: Option<String>,
    pub paragraphs: Vec<String>,
}

#[derive(Error, Debug)]
pub enum PageError {
    #[error("page request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("page answered HTTP {0}")]
    Status(u16),

    #[error("page is behind bot protection")]
    BotProtection,
}

pub struct PageFetcher {
    client: Client,
    max_content_length: usize,
}

impl PageFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(15))
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .build()?,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
        })
    }

    pub fn with_max_content_length(mut self, max_content_length: usize) -> Self {
        self.max_content_length = max_content_length;
        self
    }

    /// One attempt, no retry.
    pub async fn fetch(&self, url: &str) -> Result<PageDigest, PageError> {
        tracing::debug!(url, "fetching article page");
        let res = self.client.get(url).send().await?;

        if !res.status().is_success() {
            return Err(PageError::Status(res.status().as_u16()));
        }

        let body = res.text().await?;
        if body.contains("Attention Required!") || body.contains("Checking your browser") {
            return Err(PageError::BotProtection);
        }

        let mut digest = PageDigest::from_html(url, &body);
        digest.truncate_content(self.max_content_length);
        Ok(digest)
    }
}

fn first_attr(doc: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    doc.select(&selector)
        .filter_map(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

fn first_text(doc: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    doc.select(&selector)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .find(|t| !t.is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl PageDigest {
    pub fn from_html(url: &str, html: &str) -> Self {
        let doc = Html::parse_document(html);

        let title = first_attr(&doc, "meta[property='og:title']", "content")
            .or_else(|| first_attr(&doc, "meta[name='twitter:title']", "content"))
            .or_else(|| first_text(&doc, "h1"))
            .or_else(|| first_text(&doc, "title"));

        let description = first_attr(&doc, "meta[property='og:description']", "content")
            .or_else(|| first_attr(&doc, "meta[name='description']", "content"));

        let image = first_attr(&doc, "meta[property='og:image']", "content")
            .or_else(|| first_attr(&doc, "meta[name='twitter:image']", "content"));

        let published_at = first_attr(&doc, "meta[property='article:published_time']", "content")
            .or_else(|| first_attr(&doc, "time[datetime]", "datetime"));

        let site_name = first_attr(&doc, "meta[property='og:site_name']", "content");

        let mut paragraphs = Vec::new();
        if let Ok(selector) = Selector::parse("article p, p") {
            for el in doc.select(&selector) {
                let text = collapse_whitespace(&el.text().collect::<String>());
                if !text.is_empty() && !paragraphs.contains(&text) {
                    paragraphs.push(text);
                }
                if paragraphs.len() >= MAX_PARAGRAPHS {
                    break;
                }
            }
        }

        Self {
            url: url.to_string(),
            title,
            description,
            image,
            published_at,
            site_name,
            paragraphs,
        }
    }

    pub fn content_length(&self) -> usize {
        self.paragraphs.iter().map(|p| p.len()).sum()
    }

    pub fn truncate_content(&mut self, max_length: usize) {
        let mut current_length = 0;
        let keep = self
            .paragraphs
            .iter()
            .take_while(|p| {
                current_length += p.len();
                current_length <= max_length
            })
            .count();
        self.paragraphs.truncate(keep);
    }

    /// Plain-text block embedded in the provider prompt.
    pub fn to_prompt_context(&self) -> String {
        let na = "N/A";
        format!(
            "URL: {}\nTitle: {}\nSite: {}\nDescription: {}\nImage: {}\nPublished: {}\nContent:\n{}\n",
            self.url,
            self.title.as_deref().unwrap_or(na),
            self.site_name.as_deref().unwrap_or(na),
            self.description.as_deref().unwrap_or(na),
            self.image.as_deref().unwrap_or(na),
            self.published_at.as_deref().unwrap_or(na),
            self.paragraphs.join("\n"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"<!doctype html>
<html><head>
  <title>Fallback title | Daily</title>
  <meta property="og:title" content="  নির্বাচনের ফল ঘোষণা  ">
  <meta property="og:image" content="https://cdn.daily.test/lead.jpg">
  <meta property="og:site_name" content="Daily Test">
  <meta name="description" content="Short summary.">
  <meta property="article:published_time" content="2026-10-18T09:00:00+06:00">
</head><body>
  <article>
    <p>First   paragraph.</p>
    <p>Second paragraph.</p>
    <p>First paragraph.</p>
  </article>
</body></html>"#;

    #[test]
    fn reads_open_graph_metadata() {
        let digest = PageDigest::from_html("https://daily.test/a/1", ARTICLE);
        assert_eq!(digest.title.as_deref(), Some("নির্বাচনের ফল ঘোষণা"));
        assert_eq!(digest.image.as_deref(), Some("https://cdn.daily.test/lead.jpg"));
        assert_eq!(digest.site_name.as_deref(), Some("Daily Test"));
        assert_eq!(digest.description.as_deref(), Some("Short summary."));
        assert_eq!(digest.published_at.as_deref(), Some("2026-10-18T09:00:00+06:00"));
    }

    #[test]
    fn paragraphs_are_collapsed_and_deduplicated() {
        let digest = PageDigest::from_html("https://daily.test/a/1", ARTICLE);
        assert_eq!(digest.paragraphs, vec!["First paragraph.", "Second paragraph."]);
    }

    #[test]
    fn falls_back_to_title_element() {
        let digest = PageDigest::from_html(
            "https://daily.test",
            "<html><head><title> Plain </title></head><body></body></html>",
        );
        assert_eq!(digest.title.as_deref(), Some("Plain"));
        assert!(digest.image.is_none());
    }

    #[test]
    fn truncation_keeps_whole_paragraphs() {
        let mut digest = PageDigest {
            paragraphs: vec!["aaaa".into(), "bbbb".into(), "cc".into()],
            ..Default::default()
        };
        digest.truncate_content(6);
        assert_eq!(digest.paragraphs, vec!["aaaa"]);
        assert_eq!(digest.content_length(), 4);
    }

    #[test]
    fn prompt_context_marks_missing_fields() {
        let digest = PageDigest {
            url: "https://x.test".into(),
            ..Default::default()
        };
        let context = digest.to_prompt_context();
        assert!(context.contains("URL: https://x.test"));
        assert!(context.contains("Title: N/A"));
    }
}
