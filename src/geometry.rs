//! Geometry shared by the renderer and the hit tester.
//!
//! Rotation follows `kurbo::Affine::rotate` in a y-down pixel space: a positive angle turns
//! clockwise on screen. [`placement_affine`] and [`point_in_rotated_rect`] both use it, so what
//! is drawn is exactly what can be hit.

use crate::config::SceneConfig;
use crate::foundation::core::{Affine, Canvas, Point, Vec2};
use crate::timeline::model::{Element, ElementContent, MediaAsset, Transform};

/// Canvas height at which a text element's font size is used verbatim.
pub const TEXT_REFERENCE_HEIGHT: f64 = 1080.0;
/// Logical edge length of a sticker before contain-fit scaling.
pub const STICKER_SOURCE_PX: f64 = 200.0;
/// Estimated advance of one character, as a fraction of the font size.
pub const TEXT_CHAR_WIDTH_FACTOR: f64 = 0.6;
/// Estimated line height, as a fraction of the font size.
pub const TEXT_LINE_HEIGHT_FACTOR: f64 = 1.4;

/// Half width and half height of an element's axis-aligned box before rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfExtents {
    /// Half of the box width.
    pub half_width: f64,
    /// Half of the box height.
    pub half_height: f64,
}

impl HalfExtents {
    /// Full box size `(width, height)`.
    pub fn size(self) -> (f64, f64) {
        (self.half_width * 2.0, self.half_height * 2.0)
    }
}

/// Largest uniform scale fitting `media` inside `canvas` without cropping.
///
/// Unknown media dimensions (0, negative, non-finite) are replaced by the canvas dimension.
/// A degenerate canvas yields 1.
pub fn contain_fit_scale(media_w: f64, media_h: f64, canvas_w: f64, canvas_h: f64) -> f64 {
    let mw = known_or(media_w, canvas_w);
    let mh = known_or(media_h, canvas_h);
    if !(mw > 0.0 && mh > 0.0 && canvas_w > 0.0 && canvas_h > 0.0) {
        return 1.0;
    }
    (canvas_w / mw).min(canvas_h / mh)
}

fn known_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { fallback }
}

/// Natural size of a media asset, with unknown dimensions replaced by the canvas size.
pub fn media_dims(asset: Option<&MediaAsset>, canvas: Canvas) -> (f64, f64) {
    let (w, h) = asset.map_or((0.0, 0.0), |a| (f64::from(a.width), f64::from(a.height)));
    (
        known_or(w, canvas.width_f64()),
        known_or(h, canvas.height_f64()),
    )
}

/// Media content size in canvas pixels at transform scale 1.
pub fn media_content_size(asset: Option<&MediaAsset>, canvas: Canvas) -> (f64, f64) {
    let (mw, mh) = media_dims(asset, canvas);
    let cs = contain_fit_scale(mw, mh, canvas.width_f64(), canvas.height_f64());
    (mw * cs, mh * cs)
}

/// Font size scaled from the reference canvas height to `canvas_height`.
pub fn scaled_font_size(font_size: f64, canvas_height: f64, reference_height: f64) -> f64 {
    if !(reference_height > 0.0) {
        return font_size;
    }
    font_size * (canvas_height / reference_height)
}

/// Estimated text box `(width, height)` for `content` at `scaled_font_size`.
///
/// A selection-box heuristic, not glyph metrics.
pub fn text_box_size(content: &str, scaled_font_size: f64) -> (f64, f64) {
    let chars = content.chars().count() as f64;
    (
        chars * scaled_font_size * TEXT_CHAR_WIDTH_FACTOR,
        scaled_font_size * TEXT_LINE_HEIGHT_FACTOR,
    )
}

/// Sticker content edge length in canvas pixels at transform scale 1.
pub fn sticker_content_size(canvas: Canvas, sticker_source_px: f64) -> f64 {
    let cs = contain_fit_scale(
        sticker_source_px,
        sticker_source_px,
        canvas.width_f64(),
        canvas.height_f64(),
    );
    sticker_source_px * cs
}

/// Unrotated content size of a visual element in canvas pixels at transform scale 1.
///
/// `None` for audio.
pub fn content_size(
    element: &Element,
    media: Option<&MediaAsset>,
    canvas: Canvas,
    config: &SceneConfig,
) -> Option<(f64, f64)> {
    match &element.content {
        ElementContent::Video { .. } | ElementContent::Image { .. } => {
            Some(media_content_size(media, canvas))
        }
        ElementContent::Text(text) => {
            let fs = scaled_font_size(
                text.font_size,
                canvas.height_f64(),
                config.text_reference_height,
            );
            Some(text_box_size(&text.content, fs))
        }
        ElementContent::Sticker { .. } => {
            let s = sticker_content_size(canvas, config.sticker_source_px);
            Some((s, s))
        }
        ElementContent::Audio { .. } => None,
    }
}

/// Half extents of an element's box, including `transform.scale`. `None` for audio.
pub fn bounds_of(
    element: &Element,
    transform: &Transform,
    media: Option<&MediaAsset>,
    canvas: Canvas,
    config: &SceneConfig,
) -> Option<HalfExtents> {
    let (w, h) = content_size(element, media, canvas, config)?;
    Some(HalfExtents {
        half_width: w * transform.scale / 2.0,
        half_height: h * transform.scale / 2.0,
    })
}

/// Canvas-space center of an element: canvas center plus `transform.position`.
pub fn element_center(transform: &Transform, canvas: Canvas) -> Point {
    canvas.center() + transform.position
}

/// Point containment in a rectangle rotated by `rotation_deg` about `center`.
///
/// Edges are inclusive.
pub fn point_in_rotated_rect(
    point: Point,
    center: Point,
    half: HalfExtents,
    rotation_deg: f64,
) -> bool {
    let local = Affine::rotate((-rotation_deg).to_radians()) * (point - center).to_point();
    local.x.abs() <= half.half_width && local.y.abs() <= half.half_height
}

/// Map content space `[0, w] x [0, h]` to canvas space for an element with `transform`.
///
/// The content is centered on [`element_center`], then rotated and scaled about that center.
pub fn placement_affine(
    transform: &Transform,
    canvas: Canvas,
    content_w: f64,
    content_h: f64,
) -> Affine {
    let center = element_center(transform, canvas);
    Affine::translate(center.to_vec2())
        * Affine::rotate(transform.rotate.to_radians())
        * Affine::scale(transform.scale)
        * Affine::translate(Vec2::new(-content_w / 2.0, -content_h / 2.0))
}

#[cfg(test)]
#[path = "../tests/unit/geometry.rs"]
mod tests;
