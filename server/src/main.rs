mod app;
mod handlers;
mod routes;
mod state;

use anyhow::Context;
use photocard_cli::config::Config;
use std::env;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use state::AppState;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set, every extraction will fail");
    }

    let client_url = env::var("CLIENT_URL").ok().filter(|v| !v.trim().is_empty());
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let state = AppState::from_config(&config)?;
    let app = app::app(state, app::cors(client_url.as_deref())?);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(%bind_addr, "photocard server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
