use anyhow::Context;
use clap::Parser;
use photocard_cli::{
    ai::GeminiClient,
    config::Config,
    export::Exporter,
    extract::Extractor,
    images::ImageResolver,
    page::PageFetcher,
    render,
    session::{Edit, ExtractionOutcome, Session},
    utils, GradientTheme,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turn a news article into a square photocard PNG", long_about = None)]
struct Args {
    /// Article URL to extract title, image, date and source from
    #[arg(short, long)]
    url: Option<String>,

    /// Headline shown on the card
    #[arg(long)]
    title: Option<String>,

    /// Hero image URL
    #[arg(long, conflicts_with = "image_file")]
    image_url: Option<String>,

    /// Hero image from a local file
    #[arg(long)]
    image_file: Option<PathBuf>,

    /// Logo image URL
    #[arg(long, conflicts_with = "logo_file")]
    logo_url: Option<String>,

    /// Logo image from a local file
    #[arg(long)]
    logo_file: Option<PathBuf>,

    /// Date text shown in the footer
    #[arg(long)]
    date: Option<String>,

    /// Source text shown in the footer
    #[arg(long)]
    source: Option<String>,

    /// Background theme: crimson, ocean, emerald, sunset or midnight
    #[arg(short, long)]
    theme: Option<GradientTheme>,

    /// Title font size in pixels
    #[arg(short, long)]
    font_size: Option<String>,

    /// Directory the card is written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Also write the preview SVG
    #[arg(long)]
    svg: bool,

    /// Also write the final card data as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn edits(&self) -> Vec<Edit> {
        let mut edits = Vec::new();
        if let Some(v) = &self.title {
            edits.push(Edit::Title(v.clone()));
        }
        if let Some(v) = &self.image_url {
            edits.push(Edit::ImageUrl(v.clone()));
        }
        if let Some(v) = &self.logo_url {
            edits.push(Edit::LogoUrl(v.clone()));
        }
        if let Some(v) = &self.date {
            edits.push(Edit::Date(v.clone()));
        }
        if let Some(v) = &self.source {
            edits.push(Edit::Source(v.clone()));
        }
        if let Some(theme) = self.theme {
            edits.push(Edit::Theme(theme));
        }
        if let Some(v) = &self.font_size {
            edits.push(Edit::FontSize(v.clone()));
        }
        edits
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env();
    let mut session = Session::new();

    // 1) Extraction, if a URL was given
    if let Some(url) = &args.url {
        let extractor = Extractor::new(Arc::new(GeminiClient::from_config(&config)))
            .with_page_fetcher(PageFetcher::new().context("building page client")?);
        if let ExtractionOutcome::Failed(err) = session.extract(&extractor, url).await? {
            tracing::warn!(%url, error = %err, "extraction failed, card left unchanged");
            eprintln!("❌ {}", err.user_message());
        }
    }

    // 2) Manual edits override whatever was extracted
    if let Some(path) = &args.image_file {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        session.upload_image(&bytes)?;
    }
    if let Some(path) = &args.logo_file {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        session.upload_logo(&bytes)?;
    }
    session.apply_all(args.edits())?;

    // 3) Render and export
    let resolver = ImageResolver::new().context("building image client")?;
    let svg = render::render_preview(&resolver, &session.card, &session.presentation).await;

    if args.svg {
        utils::save_text(&svg, &args.out_dir, "news-card-preview.svg")?;
    }
    if args.json {
        utils::save_json(&session, &args.out_dir, "news-card.json")?;
    }

    let exporter = Exporter::from_config(&config);
    match exporter.export_png(svg).await {
        Ok(png) => match utils::save_bytes(&png.bytes, &args.out_dir, &png.filename) {
            Ok(path) => println!("✅ {}", path.display()),
            Err(e) => tracing::error!(error = %e, "writing export failed"),
        },
        Err(e) => tracing::error!(error = %e, "export failed"),
    }

    Ok(())
}
