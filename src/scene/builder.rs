//! Compiles a timeline snapshot into a [`SceneTree`].
//!
//! Building never fails: elements whose media, icon or layout cannot be resolved are skipped and
//! the rest of the scene still renders.

use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::color::Color;
use crate::assets::icons::{IconSet, IconSource};
use crate::config::SceneConfig;
use crate::foundation::core::Canvas;
use crate::scene::background::{BlurBackgroundNode, ColorNode};
use crate::scene::media::MediaNode;
use crate::scene::node::{SceneNode, SceneTree};
use crate::scene::sticker::StickerNode;
use crate::scene::text::TextNode;
use crate::scene::transition::{TransitionNode, TransitionTiming};
use crate::timeline::model::{Background, Element, ElementContent, MediaAsset, Track, TrackKind};
use crate::timeline::order::{ordered_visible_elements, tracks_back_to_front};
use crate::timeline::transitions::are_elements_adjacent;

/// Scene compiler for one canvas.
#[derive(Clone)]
pub struct SceneBuilder {
    canvas: Canvas,
    config: SceneConfig,
    icons: Arc<dyn IconSource>,
}

impl SceneBuilder {
    /// Builder with default configuration and no icons.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            config: SceneConfig::default(),
            icons: Arc::new(IconSet::new()),
        }
    }

    /// Override tunables.
    pub fn with_config(mut self, config: SceneConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve sticker icons through `icons`.
    pub fn with_icons(mut self, icons: Arc<dyn IconSource>) -> Self {
        self.icons = icons;
        self
    }

    /// Compile `tracks` into a scene tree.
    ///
    /// Back-to-front: optional background, then main tracks, then the other tracks, each in list
    /// order. On video tracks a registered transition between an element and its still-adjacent
    /// successor collapses both into one transition node centered on their junction.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(width = self.canvas.width, height = self.canvas.height, tracks = tracks.len())
    )]
    pub fn build(
        &self,
        tracks: &[Track],
        media: &[MediaAsset],
        duration: f64,
        background: &Background,
    ) -> SceneTree {
        let media_by_id: HashMap<&str, &MediaAsset> =
            media.iter().map(|m| (m.id.as_str(), m)).collect();

        let mut content: Vec<Arc<SceneNode>> = Vec::new();
        for track in tracks_back_to_front(tracks) {
            match track.kind {
                TrackKind::Video => self.push_video_track(track, &media_by_id, &mut content),
                TrackKind::Text | TrackKind::Sticker => {
                    content.extend(
                        ordered_visible_elements(track)
                            .into_iter()
                            .filter_map(|el| self.element_node(el, &media_by_id))
                            .map(Arc::new),
                    );
                }
                TrackKind::Audio => {}
            }
        }

        let mut children = Vec::with_capacity(content.len() + 1);
        if let Some(bg) = self.background_node(background, &content) {
            children.push(Arc::new(bg));
        }
        children.extend(content);
        tracing::debug!(nodes = children.len(), "scene built");

        SceneTree {
            canvas: self.canvas,
            duration,
            children,
        }
    }

    fn push_video_track(
        &self,
        track: &Track,
        media_by_id: &HashMap<&str, &MediaAsset>,
        out: &mut Vec<Arc<SceneNode>>,
    ) {
        let elements = ordered_visible_elements(track);
        let mut i = 0;
        while i < elements.len() {
            let element = elements[i];
            if let Some(next) = elements.get(i + 1).copied()
                && let Some(node) = self.transition_node(track, element, next, media_by_id)
            {
                out.push(Arc::new(node));
                i += 2;
                continue;
            }
            if let Some(node) = self.element_node(element, media_by_id) {
                out.push(Arc::new(node));
            }
            i += 1;
        }
    }

    fn transition_node(
        &self,
        track: &Track,
        from: &Element,
        to: &Element,
        media_by_id: &HashMap<&str, &MediaAsset>,
    ) -> Option<SceneNode> {
        let transition = track.transitions.iter().find(|t| t.links(&from.id, &to.id))?;
        if !are_elements_adjacent(from, to, self.config.adjacency_epsilon) {
            tracing::debug!(transition = %transition.id, "transition endpoints no longer adjacent");
            return None;
        }
        if !(transition.duration.is_finite() && transition.duration > 0.0) {
            tracing::debug!(transition = %transition.id, "transition has no duration");
            return None;
        }
        let outgoing = self.media_node(from, media_by_id)?;
        let incoming = self.media_node(to, media_by_id)?;

        let timing = TransitionTiming {
            duration: transition.duration,
            transition_start: to.start_time - transition.duration / 2.0,
            outgoing_end_time: from.end_time(),
            incoming_start_time: to.start_time,
            outgoing_clamp_epsilon: self.config.outgoing_clamp_epsilon,
        };
        Some(SceneNode::Transition(TransitionNode::new(
            transition.kind,
            timing,
            Arc::new(outgoing),
            Arc::new(incoming),
        )))
    }

    fn media_node(
        &self,
        element: &Element,
        media_by_id: &HashMap<&str, &MediaAsset>,
    ) -> Option<SceneNode> {
        let media_id = element.media_id()?;
        let node = media_by_id
            .get(media_id)
            .and_then(|asset| MediaNode::new(element, asset, self.canvas));
        if node.is_none() {
            tracing::debug!(element = %element.id, media = %media_id, "media not resolvable; skipped");
        }
        node.map(SceneNode::Media)
    }

    fn element_node(
        &self,
        element: &Element,
        media_by_id: &HashMap<&str, &MediaAsset>,
    ) -> Option<SceneNode> {
        match &element.content {
            ElementContent::Video { .. } | ElementContent::Image { .. } => {
                self.media_node(element, media_by_id)
            }
            ElementContent::Text(_) => {
                TextNode::new(element, self.canvas, &self.config).map(SceneNode::Text)
            }
            ElementContent::Sticker { .. } => {
                StickerNode::new(element, self.icons.as_ref(), self.canvas, &self.config)
                    .map(SceneNode::Sticker)
            }
            ElementContent::Audio { .. } => None,
        }
    }

    fn background_node(
        &self,
        background: &Background,
        content: &[Arc<SceneNode>],
    ) -> Option<SceneNode> {
        match background {
            Background::Blur { blur_intensity } => {
                let intensity = blur_intensity.unwrap_or(self.config.default_blur_intensity);
                Some(SceneNode::BlurBackground(BlurBackgroundNode::new(
                    intensity,
                    content.to_vec(),
                )))
            }
            Background::Color { color } => match Color::parse(color) {
                Ok(c) if c.is_transparent() => None,
                Ok(c) => Some(SceneNode::Color(ColorNode::new(c.to_premul()))),
                Err(e) => {
                    tracing::warn!(color = %color, error = %e, "background color ignored");
                    None
                }
            },
            Background::None => None,
        }
    }
}

impl std::fmt::Debug for SceneBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneBuilder")
            .field("canvas", &self.canvas)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Compile a snapshot with default configuration; see [`SceneBuilder::build`].
pub fn build_scene(
    canvas: Canvas,
    tracks: &[Track],
    media: &[MediaAsset],
    duration: f64,
    background: &Background,
) -> SceneTree {
    SceneBuilder::new(canvas).build(tracks, media, duration, background)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/builder.rs"]
mod tests;
