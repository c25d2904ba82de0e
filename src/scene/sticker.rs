use std::sync::{Arc, Mutex};

use crate::assets::color::Color;
use crate::assets::icons::IconSource;
use crate::assets::media::MediaFrame;
use crate::assets::svg_raster::{parse_svg, raster_size, rasterize_svg};
use crate::config::SceneConfig;
use crate::foundation::core::Canvas;
use crate::foundation::error::ClipstackResult;
use crate::geometry::{placement_affine, sticker_content_size};
use crate::render::renderer::Renderer;
use crate::render::surface::Surface;
use crate::scene::node::NodeTiming;
use crate::timeline::model::{Element, ElementContent, Transform};

/// An icon sticker: a parsed SVG tree, optionally tinted, drawn in a square box.
pub struct StickerNode {
    element_id: String,
    timing: NodeTiming,
    transform: Transform,
    opacity: f64,
    tint: Option<Color>,
    tree: Arc<usvg::Tree>,
    canvas: Canvas,
    edge: f64,
    raster: Mutex<Option<((u32, u32), MediaFrame)>>,
}

impl StickerNode {
    /// Resolve the element's icon through `icons` and parse it.
    ///
    /// `None` for non-sticker elements, unknown icons and unparsable SVG.
    pub fn new(
        element: &Element,
        icons: &dyn IconSource,
        canvas: Canvas,
        config: &SceneConfig,
    ) -> Option<Self> {
        let ElementContent::Sticker {
            icon_name,
            color,
            transform,
            opacity,
        } = &element.content
        else {
            return None;
        };

        let Some(svg) = icons.icon_svg(icon_name) else {
            tracing::debug!(element = %element.id, icon = %icon_name, "unknown sticker icon");
            return None;
        };
        let tree = match parse_svg(&svg) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::debug!(element = %element.id, icon = %icon_name, error = %e, "sticker svg rejected");
                return None;
            }
        };
        let tint = if color.trim().is_empty() {
            None
        } else {
            Color::parse(color)
                .map_err(|e| tracing::debug!(element = %element.id, error = %e, "sticker tint ignored"))
                .ok()
        };

        Some(Self {
            element_id: element.id.clone(),
            timing: NodeTiming::of(element),
            transform: *transform,
            opacity: *opacity,
            tint,
            tree: Arc::new(tree),
            canvas,
            edge: sticker_content_size(canvas, config.sticker_source_px),
            raster: Mutex::new(None),
        })
    }

    /// Id of the drawn element.
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// Box edge length at transform scale 1.
    pub fn edge(&self) -> f64 {
        self.edge
    }

    fn raster(&self, size: (u32, u32)) -> ClipstackResult<MediaFrame> {
        let mut cache = self
            .raster
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some((cached, frame)) = cache.as_ref()
            && *cached == size
        {
            return Ok(frame.clone());
        }
        let mut frame = rasterize_svg(&self.tree, size.0, size.1)?;
        if let Some(tint) = self.tint {
            frame = frame.tinted(tint.to_array())?;
        }
        *cache = Some((size, frame.clone()));
        Ok(frame)
    }

    pub(crate) fn render(
        &self,
        renderer: &mut Renderer,
        target: &mut Surface,
        time: f64,
    ) -> ClipstackResult<()> {
        if !self.timing.is_active(time) {
            return Ok(());
        }
        let scale = self.transform.scale * renderer.view_scale();
        let Ok(size) = raster_size(self.edge, self.edge, scale) else {
            tracing::debug!(element = %self.element_id, "sticker too small or too large to draw");
            return Ok(());
        };
        let frame = self.raster(size)?;
        let placement = placement_affine(&self.transform, self.canvas, self.edge, self.edge);
        renderer.draw_frame(target, &frame, placement, (self.edge, self.edge), self.opacity)
    }
}

impl std::fmt::Debug for StickerNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StickerNode")
            .field("element_id", &self.element_id)
            .field("timing", &self.timing)
            .field("transform", &self.transform)
            .field("tint", &self.tint)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/sticker.rs"]
mod tests;
