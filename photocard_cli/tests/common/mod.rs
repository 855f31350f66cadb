#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use image::{ImageFormat, Rgba, RgbaImage};
use photocard_cli::ai::ExtractionProvider;
use photocard_cli::error::ExtractionError;
use photocard_cli::page::PageDigest;
use std::io::Cursor;
use std::sync::Mutex;

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn png_bytes(color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(8, 6, Rgba(color));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Provider that answers from a script and remembers what it was asked.
pub struct FakeProvider {
    answer: Mutex<Option<Result<String, ExtractionError>>>,
    pub calls: Mutex<Vec<(String, Option<PageDigest>)>>,
}

impl FakeProvider {
    pub fn answering(json: &str) -> Self {
        Self {
            answer: Mutex::new(Some(Ok(json.to_string()))),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: ExtractionError) -> Self {
        Self {
            answer: Mutex::new(Some(Err(err))),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ExtractionProvider for FakeProvider {
    async fn extract(&self, url: &str, page: Option<&PageDigest>) -> Result<String, ExtractionError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), page.cloned()));
        self.answer
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(ExtractionError::EmptyResponse))
    }
}
