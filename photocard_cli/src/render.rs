//! The 500×500 photocard composition as an SVG document.
//!
//! Rendering is a pure function of the card, the presentation choice and
//! the already-resolved images; see [`crate::images`] for how those are
//! obtained.

use std::fmt::Write as _;

use crate::images::{CardImages, ImageResolver, ResolvedImage};
use crate::{locale, CardData, PresentationChoice};

pub const CARD_SIZE: u32 = 500;

const FONT_STACK: &str = "'Noto Sans Bengali', 'Hind Siliguri', 'Noto Sans', sans-serif";
const MARGIN: f32 = 20.0;

const HERO_Y: f32 = 70.0;
const HERO_HEIGHT: f32 = 230.0;

const LOGO_X: f32 = 380.0;
const LOGO_Y: f32 = 16.0;
const LOGO_WIDTH: f32 = 104.0;
const LOGO_HEIGHT: f32 = 42.0;

const TITLE_TOP: f32 = 312.0;
const TITLE_HEIGHT: f32 = 108.0;
const LINE_HEIGHT: f32 = 1.25;
/// Average advance of a title glyph relative to the font size.
const GLYPH_ADVANCE: f32 = 0.55;

const CTA_Y: f32 = 426.0;
const FOOTER_RULE_Y: f32 = 466.0;
const FOOTER_TEXT_Y: f32 = 488.0;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn estimated_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * GLYPH_ADVANCE
}

/// Greedy word wrap into at most `max_lines` lines. Overflow is cut and the
/// last line ends in an ellipsis.
pub fn wrap_title(title: &str, font_size: u32, max_width: f32, max_lines: usize) -> Vec<String> {
    let size = font_size as f32;
    let max_chars = ((max_width / (size * GLYPH_ADVANCE)).floor() as usize).max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in title.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if estimated_width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        // Words wider than a line are split on character boundaries.
        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(max_chars).peekable();
        while let Some(chunk) = chunks.next() {
            let piece: String = chunk.iter().collect();
            if chunks.peek().is_some() {
                lines.push(piece);
            } else {
                current = piece;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    let max_lines = max_lines.max(1);
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let keep = last.chars().count().min(max_chars.saturating_sub(1));
            *last = format!("{}…", last.chars().take(keep).collect::<String>().trim_end());
        }
    }
    lines
}

fn hero(svg: &mut String, image: &ResolvedImage) {
    let width = CARD_SIZE as f32 - 2.0 * MARGIN;
    match image {
        ResolvedImage::Embedded(uri) => {
            let _ = write!(
                svg,
                r#"<g id="hero"><image x="{MARGIN}" y="{HERO_Y}" width="{width}" height="{HERO_HEIGHT}" preserveAspectRatio="xMidYMid slice" clip-path="url(#hero-clip)" href="{}"/></g>"#,
                escape(uri)
            );
        }
        ResolvedImage::Placeholder => {
            let cx = CARD_SIZE as f32 / 2.0;
            let cy = HERO_Y + HERO_HEIGHT / 2.0;
            let _ = write!(
                svg,
                r##"<g id="hero" data-placeholder="true"><rect x="{MARGIN}" y="{HERO_Y}" width="{width}" height="{HERO_HEIGHT}" rx="14" fill="#e5e7eb"/><path d="M{x0} {y0} l40 -44 l28 30 l18 -18 l38 32 z" fill="#9ca3af"/><circle cx="{sx}" cy="{sy}" r="10" fill="#9ca3af"/><text x="{cx}" y="{ty}" font-family="{FONT_STACK}" font-size="16" fill="#6b7280" text-anchor="middle">{}</text></g>"##,
                escape(locale::NO_IMAGE),
                x0 = cx - 62.0,
                y0 = cy + 10.0,
                sx = cx + 34.0,
                sy = cy - 40.0,
                ty = cy + 44.0,
            );
        }
    }
}

fn logo_badge(svg: &mut String, logo: &ResolvedImage) {
    let _ = write!(
        svg,
        r##"<g id="logo-badge"><rect x="{LOGO_X}" y="{LOGO_Y}" width="{LOGO_WIDTH}" height="{LOGO_HEIGHT}" rx="8" fill="#ffffff"/>"##
    );
    match logo {
        ResolvedImage::Embedded(uri) => {
            let _ = write!(
                svg,
                r#"<image x="{x}" y="{y}" width="{w}" height="{h}" preserveAspectRatio="xMidYMid meet" href="{}"/>"#,
                escape(uri),
                x = LOGO_X + 6.0,
                y = LOGO_Y + 4.0,
                w = LOGO_WIDTH - 12.0,
                h = LOGO_HEIGHT - 8.0,
            );
        }
        ResolvedImage::Placeholder => {
            let gx = LOGO_X + 8.0;
            let gy = LOGO_Y + 7.0;
            let _ = write!(
                svg,
                r##"<g data-fallback-logo="true"><rect x="{gx}" y="{gy}" width="28" height="28" rx="5" fill="#111827"/><rect x="{bx}" y="{b1}" width="16" height="3" fill="#ffffff"/><rect x="{bx}" y="{b2}" width="16" height="3" fill="#ffffff"/><rect x="{bx}" y="{b3}" width="10" height="3" fill="#ffffff"/><text x="{tx}" y="{ty}" font-family="{FONT_STACK}" font-size="15" font-weight="700" fill="#111827">সংবাদ</text></g>"##,
                bx = gx + 6.0,
                b1 = gy + 7.0,
                b2 = gy + 13.0,
                b3 = gy + 19.0,
                tx = gx + 34.0,
                ty = gy + 19.0,
            );
        }
    }
    svg.push_str("</g>");
}

fn title_block(svg: &mut String, title: &str, font_size: u32) {
    let size = font_size as f32;
    let line_height = size * LINE_HEIGHT;
    let max_lines = ((TITLE_HEIGHT / line_height).floor() as usize).max(1);
    let lines = wrap_title(title, font_size, CARD_SIZE as f32 - 2.0 * MARGIN, max_lines);

    let block_height = lines.len() as f32 * line_height;
    let first_baseline = TITLE_TOP + (TITLE_HEIGHT - block_height).max(0.0) / 2.0 + size;
    let cx = CARD_SIZE as f32 / 2.0;

    let _ = write!(
        svg,
        r##"<g id="title" font-family="{FONT_STACK}" font-size="{font_size}" font-weight="700" fill="#ffffff" text-anchor="middle">"##
    );
    for (i, line) in lines.iter().enumerate() {
        let y = first_baseline + i as f32 * line_height;
        let _ = write!(svg, r#"<text x="{cx}" y="{y}">{}</text>"#, escape(line));
    }
    svg.push_str("</g>");
}

fn call_to_action(svg: &mut String) {
    let width = 170.0;
    let x = (CARD_SIZE as f32 - width) / 2.0;
    let _ = write!(
        svg,
        r##"<g id="cta"><rect x="{x}" y="{CTA_Y}" width="{width}" height="30" rx="15" fill="#facc15"/><text x="{cx}" y="{ty}" font-family="{FONT_STACK}" font-size="15" font-weight="700" fill="#111827" text-anchor="middle">{}</text></g>"##,
        escape(locale::CALL_TO_ACTION),
        cx = CARD_SIZE as f32 / 2.0,
        ty = CTA_Y + 20.0,
    );
}

fn footer(svg: &mut String, card: &CardData) {
    let right = CARD_SIZE as f32 - MARGIN;
    let _ = write!(
        svg,
        r##"<g id="footer" font-family="{FONT_STACK}" font-size="14" fill="#ffffff"><line x1="{MARGIN}" y1="{FOOTER_RULE_Y}" x2="{right}" y2="{FOOTER_RULE_Y}" stroke="#ffffff" stroke-opacity="0.45"/><text x="{MARGIN}" y="{FOOTER_TEXT_Y}">{}</text><text x="{right}" y="{FOOTER_TEXT_Y}" text-anchor="end">{}</text></g>"##,
        escape(&card.date),
        escape(&card.source),
    );
}

/// Projects the current state onto the fixed layout.
pub fn render_svg(card: &CardData, presentation: &PresentationChoice, images: &CardImages) -> String {
    let theme = presentation.gradient_theme;
    let (from, to) = theme.stops();
    let hero_width = CARD_SIZE as f32 - 2.0 * MARGIN;

    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CARD_SIZE}" height="{CARD_SIZE}" viewBox="0 0 {CARD_SIZE} {CARD_SIZE}">"#
    );
    let _ = write!(
        svg,
        r#"<defs><linearGradient id="bg" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="{from}"/><stop offset="1" stop-color="{to}"/></linearGradient><clipPath id="hero-clip"><rect x="{MARGIN}" y="{HERO_Y}" width="{hero_width}" height="{HERO_HEIGHT}" rx="14"/></clipPath></defs>"#
    );
    let _ = write!(
        svg,
        r#"<rect id="background" data-theme="{}" width="{CARD_SIZE}" height="{CARD_SIZE}" fill="url(#bg)"/>"#,
        theme.id()
    );

    logo_badge(&mut svg, &images.logo);
    hero(&mut svg, &images.hero);
    title_block(&mut svg, &card.title, presentation.font_size_px);
    call_to_action(&mut svg);
    footer(&mut svg, card);

    svg.push_str("</svg>");
    svg
}

/// Resolves the card's images and renders the preview.
pub async fn render_preview(
    resolver: &ImageResolver,
    card: &CardData,
    presentation: &PresentationChoice,
) -> String {
    let images = resolver.resolve_card(card).await;
    render_svg(card, presentation, &images)
}
