use std::sync::Arc;

use crate::assets::media::MediaSource;
use crate::foundation::core::Canvas;
use crate::foundation::error::ClipstackResult;
use crate::geometry::{media_content_size, placement_affine};
use crate::render::renderer::Renderer;
use crate::render::surface::Surface;
use crate::scene::node::NodeTiming;
use crate::timeline::model::{Element, ElementContent, MediaAsset, MediaKind, Transform};
use crate::timeline::speed::{clamp_playback_rate, source_time};

/// A video or image element bound to a resolved media source.
pub struct MediaNode {
    element_id: String,
    kind: MediaKind,
    source: Arc<dyn MediaSource>,
    timing: NodeTiming,
    transform: Transform,
    opacity: f64,
    playback_rate: f64,
    canvas: Canvas,
    content_size: (f64, f64),
}

impl MediaNode {
    /// Bind `element` to `asset`. `None` when the element is not video/image or the asset has no
    /// displayable source (or is audio).
    pub fn new(element: &Element, asset: &MediaAsset, canvas: Canvas) -> Option<Self> {
        let (transform, opacity, playback_rate) = match &element.content {
            ElementContent::Video {
                transform,
                opacity,
                playback_rate,
                ..
            } => (*transform, *opacity, clamp_playback_rate(*playback_rate)),
            ElementContent::Image {
                transform, opacity, ..
            } => (*transform, *opacity, 1.0),
            _ => return None,
        };
        if !asset.is_displayable() {
            return None;
        }
        let source = Arc::clone(asset.source.as_ref()?);
        Some(Self {
            element_id: element.id.clone(),
            kind: asset.kind,
            source,
            timing: NodeTiming::of(element),
            transform,
            opacity,
            playback_rate,
            canvas,
            content_size: media_content_size(Some(asset), canvas),
        })
    }

    /// Id of the drawn element.
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// Visible window.
    pub fn timing(&self) -> NodeTiming {
        self.timing
    }

    /// Source time shown at timeline `time`; images always show time 0.
    pub fn source_time(&self, time: f64) -> f64 {
        match self.kind {
            MediaKind::Video => source_time(
                time,
                self.timing.start_time,
                self.timing.trim_start,
                self.playback_rate,
            ),
            MediaKind::Image | MediaKind::Audio => 0.0,
        }
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
        let frame = match self.source.frame_at(self.source_time(time)) {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(()),
            Err(e) => {
                tracing::warn!(element = %self.element_id, error = %e, "media source failed");
                return Err(e);
            }
        };
        let (w, h) = self.content_size;
        let placement = placement_affine(&self.transform, self.canvas, w, h);
        renderer.draw_frame(target, &frame, placement, (w, h), self.opacity)
    }
}

impl std::fmt::Debug for MediaNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaNode")
            .field("element_id", &self.element_id)
            .field("kind", &self.kind)
            .field("timing", &self.timing)
            .field("transform", &self.transform)
            .field("opacity", &self.opacity)
            .field("playback_rate", &self.playback_rate)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/media.rs"]
mod tests;
