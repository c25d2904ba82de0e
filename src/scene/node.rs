use std::sync::Arc;

use crate::foundation::core::Canvas;
use crate::foundation::error::ClipstackResult;
use crate::render::renderer::Renderer;
use crate::render::surface::Surface;
use crate::scene::background::{BlurBackgroundNode, ColorNode};
use crate::scene::media::MediaNode;
use crate::scene::sticker::StickerNode;
use crate::scene::text::TextNode;
use crate::scene::transition::TransitionNode;
use crate::timeline::model::Element;

/// Blur intensity used when a blur background does not specify one.
pub const DEFAULT_BLUR_INTENSITY: f64 = 8.0;

/// Visible window of an element-backed node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeTiming {
    /// Timeline start in seconds.
    pub start_time: f64,
    /// Visible duration in seconds.
    pub duration: f64,
    /// Source offset at `start_time`.
    pub trim_start: f64,
    /// Amount trimmed from the source end.
    pub trim_end: f64,
}

impl NodeTiming {
    /// Timing of `element`.
    pub fn of(element: &Element) -> Self {
        Self {
            start_time: element.start_time,
            duration: element.duration,
            trim_start: element.trim_start,
            trim_end: element.trim_end,
        }
    }

    /// `[start_time, start_time + duration)`, matching [`Element::is_visible_at`].
    pub fn is_active(&self, time: f64) -> bool {
        time >= self.start_time && time < self.start_time + self.duration
    }
}

/// One renderable unit of a compiled scene.
///
/// Nodes are immutable after construction apart from private caches (rasterized text and
/// stickers, transition buffers).
#[derive(Debug)]
pub enum SceneNode {
    /// Video or image.
    Media(MediaNode),
    /// Text.
    Text(TextNode),
    /// Icon sticker.
    Sticker(StickerNode),
    /// Flat background color.
    Color(ColorNode),
    /// Blurred copy of the content beneath it.
    BlurBackground(BlurBackgroundNode),
    /// Two media nodes blended across their junction.
    Transition(TransitionNode),
}

impl SceneNode {
    /// Draw this node into `target` at timeline `time`.
    pub fn render(
        &self,
        renderer: &mut Renderer,
        target: &mut Surface,
        time: f64,
    ) -> ClipstackResult<()> {
        match self {
            Self::Media(n) => n.render(renderer, target, time),
            Self::Text(n) => n.render(renderer, target, time),
            Self::Sticker(n) => n.render(renderer, target, time),
            Self::Color(n) => n.render(renderer, target),
            Self::BlurBackground(n) => n.render(renderer, target, time),
            Self::Transition(n) => n.render(renderer, target, time),
        }
    }

    /// Ids of the elements this node draws, in draw order.
    pub fn element_ids(&self) -> Vec<&str> {
        match self {
            Self::Media(n) => vec![n.element_id()],
            Self::Text(n) => vec![n.element_id()],
            Self::Sticker(n) => vec![n.element_id()],
            Self::Color(_) | Self::BlurBackground(_) => Vec::new(),
            Self::Transition(n) => {
                let mut ids = n.outgoing().element_ids();
                ids.extend(n.incoming().element_ids());
                ids
            }
        }
    }
}

/// Root of a compiled scene: children render back-to-front.
#[derive(Debug)]
pub struct SceneTree {
    /// Canvas the scene was built for.
    pub canvas: Canvas,
    /// Project duration in seconds.
    pub duration: f64,
    /// Top-level nodes, back-to-front.
    pub children: Vec<Arc<SceneNode>>,
}

impl SceneTree {
    /// Render at `time`; see [`Renderer::render_frame`].
    pub fn render(
        &self,
        renderer: &mut Renderer,
        target: &mut Surface,
        time: f64,
    ) -> ClipstackResult<()> {
        renderer.render_frame(self, target, time)
    }

    /// Element ids in draw order, background nodes excluded.
    pub fn element_ids(&self) -> Vec<&str> {
        self.children.iter().flat_map(|c| c.element_ids()).collect()
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// `true` when the scene draws nothing.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
