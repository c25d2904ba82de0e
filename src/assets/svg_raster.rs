//! SVG parsing and rasterization for text and sticker nodes.
//!
//! Trees are parsed with `usvg` against a process-wide system font database and rasterized with
//! `resvg` into premultiplied RGBA8 frames.

use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use anyhow::Context;

use crate::assets::media::MediaFrame;
use crate::foundation::error::{ClipstackError, ClipstackResult};

/// Largest raster edge produced for a single SVG.
pub const MAX_RASTER_DIM: u32 = 8_192;

fn system_fontdb() -> Arc<usvg::fontdb::Database> {
    static FONTDB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    Arc::clone(FONTDB.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Arc::new(db)
    }))
}

fn font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families: Vec<usvg::fontdb::Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                })
                .collect();
            families.push(usvg::fontdb::Family::SansSerif);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };
            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            // Any face beats dropping the text entirely.
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

/// Parse an SVG document.
pub fn parse_svg(svg: &str) -> ClipstackResult<usvg::Tree> {
    let opts = usvg::Options {
        fontdb: system_fontdb(),
        font_resolver: font_resolver(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Pixel size for drawing `(w, h)` logical units at `scale`, rounded up and bounded.
pub fn raster_size(w: f64, h: f64, scale: f64) -> ClipstackResult<(u32, u32)> {
    fn to_px(v: f64) -> ClipstackResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(ClipstackError::evaluation("svg raster size must be positive"));
        }
        let px = v.ceil().max(1.0);
        if px > f64::from(MAX_RASTER_DIM) {
            return Err(ClipstackError::evaluation(format!(
                "svg raster size too large: {px} (max {MAX_RASTER_DIM})"
            )));
        }
        Ok(px as u32)
    }
    let s = scale.abs().max(1e-6);
    Ok((to_px(w * s)?, to_px(h * s)?))
}

/// Rasterize `tree` stretched to `width`x`height` pixels.
pub fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> ClipstackResult<MediaFrame> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ClipstackError::evaluation("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia output is already premultiplied.
    MediaFrame::from_premul_rgba8(pixmap.data(), width, height)
}

/// Escape text for use inside SVG markup.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
