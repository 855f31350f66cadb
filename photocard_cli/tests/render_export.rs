mod common;

use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;
use photocard_cli::export::Exporter;
use photocard_cli::images::{CardImages, ImageResolver, ResolvedImage};
use photocard_cli::render::{render_preview, render_svg};
use photocard_cli::session::{Edit, Session};
use photocard_cli::GradientTheme;

async fn image_server() -> String {
    let app = Router::new()
        .route(
            "/hero.png",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], common::png_bytes([0, 128, 255, 255])) }),
        )
        .route("/gone.png", get(|| async { StatusCode::NOT_FOUND }))
        .route("/page.html", get(|| async { "<html>not an image</html>" }));
    common::spawn(app).await
}

fn pixel(png: &[u8], x: u32, y: u32) -> [u8; 4] {
    image::load_from_memory(png).unwrap().to_rgba8().get_pixel(x, y).0
}

#[tokio::test]
async fn reachable_image_is_embedded_in_the_preview() {
    let base = image_server().await;
    let resolver = ImageResolver::new().unwrap();
    let mut session = Session::new();
    session.apply(Edit::ImageUrl(format!("{base}/hero.png"))).unwrap();

    let images = resolver.resolve_card(&session.card).await;
    let ResolvedImage::Embedded(uri) = &images.hero else {
        panic!("hero should load");
    };
    assert_eq!(
        photocard_cli::images::decode_data_uri(uri).unwrap(),
        common::png_bytes([0, 128, 255, 255])
    );

    let svg = render_svg(&session.card, &session.presentation, &images);
    assert!(svg.contains(uri.as_str()));
    // Rendering substitutes; the card keeps the URL the user gave.
    assert_eq!(session.card.image_url, format!("{base}/hero.png"));
}

#[tokio::test]
async fn broken_images_render_as_placeholders() {
    let base = image_server().await;
    let resolver = ImageResolver::new().unwrap();

    for href in [format!("{base}/gone.png"), format!("{base}/page.html")] {
        let mut session = Session::new();
        session.apply(Edit::ImageUrl(href.clone())).unwrap();
        session.apply(Edit::LogoUrl(href.clone())).unwrap();

        let svg = render_preview(&resolver, &session.card, &session.presentation).await;

        assert!(svg.contains(r#"data-placeholder="true""#), "{href}");
        assert!(svg.contains(r#"data-fallback-logo="true""#), "{href}");
        assert_eq!(session.card.image_url, href);
    }
}

#[tokio::test]
async fn oversized_remote_image_is_not_downloaded() {
    let base = image_server().await;
    let href = format!("{base}/hero.png");
    let png_len = common::png_bytes([0, 128, 255, 255]).len();

    let capped = ImageResolver::new().unwrap().with_max_bytes(png_len - 1);
    assert!(capped.resolve(&href).await.is_placeholder());

    let exact = ImageResolver::new().unwrap().with_max_bytes(png_len);
    assert!(!exact.resolve(&href).await.is_placeholder());
}

#[tokio::test]
async fn exporting_twice_gives_identical_pixels() {
    let exporter = Exporter::new(None);
    let mut session = Session::new();
    session
        .upload_image(&common::png_bytes([10, 200, 30, 255]))
        .unwrap();
    let resolver = ImageResolver::new().unwrap();
    let svg = render_preview(&resolver, &session.card, &session.presentation).await;

    let first = exporter.export_png(svg.clone()).await.unwrap();
    let second = exporter.export_png(svg).await.unwrap();

    assert_eq!(first.bytes, second.bytes);
    for export in [&first, &second] {
        let stamp = export
            .filename
            .strip_prefix("news-card-")
            .and_then(|rest| rest.strip_suffix(".png"))
            .unwrap();
        assert!(stamp.parse::<i64>().is_ok(), "{}", export.filename);
    }
}

#[tokio::test]
async fn overlapping_exports_both_complete() {
    let exporter = std::sync::Arc::new(Exporter::new(None));
    let svg = render_svg(
        &Session::new().card,
        &Session::new().presentation,
        &CardImages::placeholders(),
    );

    let a = tokio::spawn({
        let exporter = exporter.clone();
        let svg = svg.clone();
        async move { exporter.export_png(svg).await.unwrap() }
    });
    let b = tokio::spawn({
        let exporter = exporter.clone();
        async move { exporter.export_png(svg).await.unwrap() }
    });

    let (a, b) = (a.await.unwrap(), b.await.unwrap());
    assert_eq!(a.bytes, b.bytes);
}

#[tokio::test]
async fn uploaded_hero_shows_in_the_export() {
    let exporter = Exporter::new(None);
    let mut session = Session::new();
    session
        .upload_image(&common::png_bytes([0, 0, 255, 255]))
        .unwrap();
    let resolver = ImageResolver::new().unwrap();
    let svg = render_preview(&resolver, &session.card, &session.presentation).await;

    let png = exporter.export_png(svg).await.unwrap();

    // Center of the hero box.
    assert_eq!(pixel(&png.bytes, 250, 185), [0, 0, 255, 255]);
}

#[tokio::test]
async fn theme_change_repaints_only_the_background() {
    let exporter = Exporter::new(None);
    let images = CardImages::placeholders();
    let mut session = Session::new();
    let crimson = exporter
        .export_png(render_svg(&session.card, &session.presentation, &images))
        .await
        .unwrap();

    session.apply(Edit::Theme(GradientTheme::Ocean)).unwrap();
    let ocean = exporter
        .export_png(render_svg(&session.card, &session.presentation, &images))
        .await
        .unwrap();

    // Left margin is pure background; the hero placeholder is not.
    assert_ne!(pixel(&crimson.bytes, 5, 250), pixel(&ocean.bytes, 5, 250));
    assert_eq!(pixel(&crimson.bytes, 60, 100), pixel(&ocean.bytes, 60, 100));
}
