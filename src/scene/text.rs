use std::fmt::Write as _;
use std::sync::Mutex;

use crate::assets::color::Color;
use crate::assets::media::MediaFrame;
use crate::assets::svg_raster::{escape_xml, parse_svg, raster_size, rasterize_svg};
use crate::config::SceneConfig;
use crate::foundation::core::Canvas;
use crate::foundation::error::ClipstackResult;
use crate::geometry::{placement_affine, scaled_font_size, text_box_size};
use crate::render::renderer::Renderer;
use crate::render::surface::Surface;
use crate::scene::node::NodeTiming;
use crate::timeline::model::{Element, ElementContent, TextContent};

/// Glyphs may run past the estimated box; the raster leaves this much horizontal room.
const OVERFLOW_FACTOR: f64 = 2.0;

/// A text element, laid out through SVG and rasterized on demand.
///
/// The raster is cached for the last pixel size it was drawn at.
pub struct TextNode {
    element_id: String,
    timing: NodeTiming,
    text: TextContent,
    canvas: Canvas,
    font_size: f64,
    box_size: (f64, f64),
    raster: Mutex<Option<CachedRaster>>,
}

struct CachedRaster {
    size: (u32, u32),
    frame: Option<MediaFrame>,
}

impl TextNode {
    /// `None` for non-text elements.
    pub fn new(element: &Element, canvas: Canvas, config: &SceneConfig) -> Option<Self> {
        let ElementContent::Text(text) = &element.content else {
            return None;
        };
        let font_size = scaled_font_size(
            text.font_size,
            canvas.height_f64(),
            config.text_reference_height,
        );
        Some(Self {
            element_id: element.id.clone(),
            timing: NodeTiming::of(element),
            text: text.clone(),
            canvas,
            font_size,
            box_size: text_box_size(&text.content, font_size),
            raster: Mutex::new(None),
        })
    }

    /// Id of the drawn element.
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// Font size after scaling to the canvas height.
    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Estimated text box at transform scale 1.
    pub fn box_size(&self) -> (f64, f64) {
        self.box_size
    }

    fn layout_size(&self) -> (f64, f64) {
        (self.box_size.0 * OVERFLOW_FACTOR, self.box_size.1)
    }

    /// SVG document drawing the text centered in [`TextNode::layout_size`] units.
    pub(crate) fn svg(&self) -> String {
        let (w, h) = self.layout_size();
        let (box_w, box_h) = self.box_size;
        let t = &self.text;
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );

        match Color::parse(&t.background_color) {
            Ok(bg) if !bg.is_transparent() => {
                let _ = write!(
                    svg,
                    r#"<rect x="{x}" y="0" width="{box_w}" height="{box_h}" fill="{fill}" fill-opacity="{op}"/>"#,
                    x = (w - box_w) / 2.0,
                    fill = bg.svg_hex(),
                    op = bg.svg_opacity(),
                );
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(element = %self.element_id, error = %e, "text background ignored"),
        }

        let fill = Color::parse(&t.color).unwrap_or_else(|e| {
            tracing::debug!(element = %self.element_id, error = %e, "text color defaulted to white");
            Color::rgb(255, 255, 255)
        });
        let _ = write!(
            svg,
            r#"<text x="{cx}" y="{cy}" font-family="{family}" font-size="{size}" font-weight="{weight}" font-style="{style}" text-decoration="{decoration}" fill="{fill}" fill-opacity="{op}" text-anchor="middle" dominant-baseline="central">{content}</text></svg>"#,
            cx = w / 2.0,
            cy = h / 2.0,
            family = escape_xml(&t.font_family),
            size = self.font_size,
            weight = escape_xml(&t.font_weight),
            style = escape_xml(&t.font_style),
            decoration = escape_xml(&t.text_decoration),
            fill = fill.svg_hex(),
            op = fill.svg_opacity(),
            content = escape_xml(&t.content),
        );
        svg
    }

    fn raster(&self, size: (u32, u32)) -> Option<MediaFrame> {
        let mut cache = self
            .raster
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(c) = cache.as_ref()
            && c.size == size
        {
            return c.frame.clone();
        }

        let frame = parse_svg(&self.svg())
            .and_then(|tree| rasterize_svg(&tree, size.0, size.1))
            .map_err(|e| {
                tracing::debug!(element = %self.element_id, error = %e, "text layout failed");
            })
            .ok();
        *cache = Some(CachedRaster {
            size,
            frame: frame.clone(),
        });
        frame
    }

    pub(crate) fn render(
        &self,
        renderer: &mut Renderer,
        target: &mut Surface,
        time: f64,
    ) -> ClipstackResult<()> {
        if !self.timing.is_active(time) || self.text.content.is_empty() {
            return Ok(());
        }
        let (w, h) = self.layout_size();
        let scale = self.text.transform.scale * renderer.view_scale();
        let Ok(size) = raster_size(w, h, scale) else {
            tracing::debug!(element = %self.element_id, "text too small or too large to draw");
            return Ok(());
        };
        let Some(frame) = self.raster(size) else {
            return Ok(());
        };
        let placement = placement_affine(&self.text.transform, self.canvas, w, h);
        renderer.draw_frame(target, &frame, placement, (w, h), self.text.opacity)
    }
}

impl std::fmt::Debug for TextNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNode")
            .field("element_id", &self.element_id)
            .field("timing", &self.timing)
            .field("content", &self.text.content)
            .field("font_size", &self.font_size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/text.rs"]
mod tests;
