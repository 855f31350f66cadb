use photocard_cli::{
    ai::GeminiClient, config::Config, export::Exporter, extract::Extractor, images::ImageResolver,
    page::PageFetcher, session::Session,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared by every handler: the one editing session plus the services that
/// act on it. The session lock is never held across a network call.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    pub extractor: Extractor,
    pub resolver: Arc<ImageResolver>,
    pub exporter: Arc<Exporter>,
}

impl AppState {
    pub fn new(extractor: Extractor, resolver: ImageResolver, exporter: Exporter) -> Self {
        AppState {
            session: Arc::new(RwLock::new(Session::new())),
            extractor,
            resolver: Arc::new(resolver),
            exporter: Arc::new(exporter),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let extractor = Extractor::new(Arc::new(GeminiClient::from_config(config)))
            .with_page_fetcher(PageFetcher::new()?);
        Ok(Self::new(
            extractor,
            ImageResolver::new()?,
            Exporter::from_config(config),
        ))
    }

    /// Card and presentation as they are right now, without holding the lock.
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }
}
