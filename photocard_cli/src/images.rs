//! Loading hero and logo images for the renderer.
//!
//! Every image ends up either embedded as a `data:` URI the rasterizer can
//! read without network access, or as [`ResolvedImage::Placeholder`]. Load
//! failures are never errors for the caller.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use std::io::Cursor;
use std::time::Duration;
use thiserror::Error;

use crate::error::UploadError;
use crate::{CardData, PLACEHOLDER_IMAGE_URL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedImage {
    /// `data:` URI holding PNG, JPEG or GIF bytes.
    Embedded(String),
    Placeholder,
}

impl ResolvedImage {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ResolvedImage::Placeholder)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardImages {
    pub hero: ResolvedImage,
    pub logo: ResolvedImage,
}

impl CardImages {
    pub fn placeholders() -> Self {
        Self {
            hero: ResolvedImage::Placeholder,
            logo: ResolvedImage::Placeholder,
        }
    }
}

#[derive(Error, Debug)]
enum LoadError {
    #[error("empty reference")]
    Empty,
    #[error("unsupported reference scheme")]
    Unsupported,
    #[error("malformed data URI")]
    MalformedDataUri,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("larger than {0} bytes")]
    TooLarge(usize),
    #[error("not a decodable image")]
    NotAnImage,
    #[error("decode task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Remote images beyond this size are not downloaded.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Format of `bytes` if this build can decode it.
fn decodable_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok().filter(|format| format.reading_enabled())
}

fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Bytes of a base64 `data:` URI, or `None` if it is not one.
pub fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    if !meta.ends_with(";base64") {
        return None;
    }
    STANDARD.decode(payload.trim()).ok()
}

/// Validates image bytes and turns them into something the rasterizer can
/// draw. PNG, JPEG and GIF pass through; other decodable formats are
/// re-encoded as PNG.
fn embeddable(bytes: &[u8]) -> Option<String> {
    let format = decodable_format(bytes)?;
    let decoded = image::load_from_memory_with_format(bytes, format).ok()?;

    match format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif => Some(to_data_uri(format.to_mime_type(), bytes)),
        _ => {
            let mut png = Cursor::new(Vec::new());
            decoded.write_to(&mut png, ImageFormat::Png).ok()?;
            Some(to_data_uri(ImageFormat::Png.to_mime_type(), png.get_ref()))
        }
    }
}

/// Converts an uploaded file into the `data:` URI stored on the card. The
/// original bytes and format are kept; the format must be one the renderer
/// can decode.
pub fn data_uri_from_upload(bytes: &[u8]) -> Result<String, UploadError> {
    let format = decodable_format(bytes).ok_or(UploadError::NotAnImage)?;
    Ok(to_data_uri(format.to_mime_type(), bytes))
}

fn preview(href: &str) -> String {
    const MAX: usize = 64;
    if href.chars().count() > MAX {
        format!("{}…", href.chars().take(MAX).collect::<String>())
    } else {
        href.to_string()
    }
}

pub struct ImageResolver {
    client: reqwest::Client,
    max_bytes: usize,
}

impl ImageResolver {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(20))
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .build()?,
            max_bytes: MAX_IMAGE_BYTES,
        })
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Never fails: anything that cannot be shown becomes a placeholder.
    pub async fn resolve(&self, href: &str) -> ResolvedImage {
        if href.trim() == PLACEHOLDER_IMAGE_URL {
            return ResolvedImage::Placeholder;
        }
        match self.load(href.trim()).await {
            Ok(uri) => ResolvedImage::Embedded(uri),
            Err(LoadError::Empty) => ResolvedImage::Placeholder,
            Err(e) => {
                tracing::warn!(href = %preview(href), error = %e, "image failed to load, using placeholder");
                ResolvedImage::Placeholder
            }
        }
    }

    /// Hero and logo are loaded concurrently.
    pub async fn resolve_card(&self, card: &CardData) -> CardImages {
        let (hero, logo) = futures::join!(self.resolve(&card.image_url), self.resolve(&card.logo_url));
        CardImages { hero, logo }
    }

    async fn load(&self, href: &str) -> Result<String, LoadError> {
        if href.is_empty() {
            return Err(LoadError::Empty);
        }

        let bytes = if href.starts_with("data:") {
            decode_data_uri(href).ok_or(LoadError::MalformedDataUri)?
        } else if href.starts_with("http://") || href.starts_with("https://") {
            self.download(href).await?
        } else {
            return Err(LoadError::Unsupported);
        };

        tokio::task::spawn_blocking(move || embeddable(&bytes))
            .await?
            .ok_or(LoadError::NotAnImage)
    }

    /// Reads the body chunk by chunk, giving up once it passes `max_bytes`.
    async fn download(&self, href: &str) -> Result<Vec<u8>, LoadError> {
        let mut response = self.client.get(href).send().await?;
        if !response.status().is_success() {
            return Err(LoadError::Status(response.status().as_u16()));
        }
        if response.content_length().is_some_and(|len| len > self.max_bytes as u64) {
            return Err(LoadError::TooLarge(self.max_bytes));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(LoadError::TooLarge(self.max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}
