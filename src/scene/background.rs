use std::sync::Arc;

use crate::effects::blur::BlurParams;
use crate::effects::composite::over_in_place;
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::ClipstackResult;
use crate::render::renderer::Renderer;
use crate::render::surface::Surface;
use crate::scene::node::SceneNode;

/// A flat fill across the whole canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorNode {
    color: Rgba8Premul,
}

impl ColorNode {
    /// Fill with premultiplied `color`.
    pub fn new(color: Rgba8Premul) -> Self {
        Self { color }
    }

    /// The fill color.
    pub fn color(&self) -> Rgba8Premul {
        self.color
    }

    pub(crate) fn render(&self, renderer: &mut Renderer, target: &mut Surface) -> ClipstackResult<()> {
        renderer.fill(target, self.color, 1.0);
        Ok(())
    }
}

/// A blurred copy of the content, drawn beneath it.
///
/// Shares the content nodes with the scene root, so each frame renders them twice: once into a
/// scratch surface that gets blurred, once for real.
#[derive(Debug)]
pub struct BlurBackgroundNode {
    intensity: f64,
    content: Vec<Arc<SceneNode>>,
}

impl BlurBackgroundNode {
    /// Blur `content` by `intensity` canvas pixels.
    pub fn new(intensity: f64, content: Vec<Arc<SceneNode>>) -> Self {
        Self { intensity, content }
    }

    /// Blur intensity in canvas pixels.
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub(crate) fn render(
        &self,
        renderer: &mut Renderer,
        target: &mut Surface,
        time: f64,
    ) -> ClipstackResult<()> {
        if self.content.is_empty() {
            return Ok(());
        }
        let mut scratch = renderer.borrow_scratch(target.width(), target.height())?;
        let out = self.render_blurred(renderer, &mut scratch, time).and_then(|()| {
            over_in_place(target.data_mut(), scratch.data(), 1.0)
        });
        renderer.release_scratch(scratch);
        out
    }

    fn render_blurred(
        &self,
        renderer: &mut Renderer,
        scratch: &mut Surface,
        time: f64,
    ) -> ClipstackResult<()> {
        for node in &self.content {
            node.render(renderer, scratch, time)?;
        }
        // Intensity is in canvas pixels; the target may be a scaled preview.
        let params = BlurParams::from_intensity(self.intensity * renderer.view_scale());
        renderer.blur(scratch, params)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/background.rs"]
mod tests;
