use chrono::{DateTime, Utc};
use resvg::tiny_skia;
use resvg::usvg::{self, fontdb};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::ExportError;
use crate::render::CARD_SIZE;

/// A rasterized card ready to be written or downloaded.
#[derive(Debug, Clone)]
pub struct PngExport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// `news-card-<epoch millis>.png`
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("news-card-{}.png", at.timestamp_millis())
}

/// Rasterizes card SVG into PNG. Overlapping exports are serialized: one
/// rasterization runs at a time, later callers wait their turn.
pub struct Exporter {
    fontdb: Arc<fontdb::Database>,
    in_progress: Mutex<()>,
}

impl Exporter {
    pub fn new(font_dir: Option<&Path>) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = font_dir {
            db.load_fonts_dir(dir);
            tracing::info!(dir = %dir.display(), "loaded extra fonts");
        }
        tracing::debug!(faces = db.len(), "font database ready");

        Self {
            fontdb: Arc::new(db),
            in_progress: Mutex::new(()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.font_dir.as_deref())
    }

    pub async fn export_png(&self, svg: String) -> Result<PngExport, ExportError> {
        let _turn = self.in_progress.lock().await;
        let fontdb = Arc::clone(&self.fontdb);

        let bytes = tokio::task::spawn_blocking(move || rasterize(&svg, fontdb)).await??;
        let filename = export_filename(Utc::now());

        tracing::info!(%filename, size = bytes.len(), "card exported");
        Ok(PngExport { filename, bytes })
    }
}

/// Full-resolution, lossless rasterization of a card composition.
pub fn rasterize(svg: &str, fontdb: Arc<fontdb::Database>) -> Result<Vec<u8>, ExportError> {
    let options = usvg::Options {
        fontdb,
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(svg, &options)?;

    let mut pixmap = tiny_skia::Pixmap::new(CARD_SIZE, CARD_SIZE).ok_or(ExportError::Pixmap {
        width: CARD_SIZE,
        height: CARD_SIZE,
    })?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| ExportError::Encode(e.to_string()))
}
