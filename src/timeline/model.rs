//! Snapshot data model handed to the core by the timeline-editing layer.
//!
//! Field names follow the editor's JSON (camelCase, `type` tags) so a persisted snapshot
//! deserializes directly.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::assets::media::MediaSource;
use crate::effects::transitions::TransitionKind;
use crate::foundation::core::Vec2;

/// Classifies which elements a track may hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Video and image elements; the only kind that owns transitions.
    #[default]
    Video,
    /// Text elements.
    Text,
    /// Sticker elements.
    Sticker,
    /// Audio elements (never rendered).
    Audio,
}

/// An ordered lane of elements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Track identity.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Track type.
    #[serde(rename = "type")]
    pub kind: TrackKind,
    /// Marks the main (primary) video track, which always renders at the back.
    #[serde(default)]
    pub is_main: bool,
    /// Hidden tracks are neither rendered nor hit-tested.
    #[serde(default)]
    pub hidden: bool,
    /// Elements in arbitrary order.
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Transitions between adjacent elements (video tracks only).
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

impl Track {
    /// Create an empty, visible, non-main track.
    pub fn new(id: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
            is_main: false,
            hidden: false,
            elements: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Create the main video track.
    pub fn main(id: impl Into<String>) -> Self {
        Self {
            is_main: true,
            ..Self::new(id, TrackKind::Video)
        }
    }

    /// Builder-style element list.
    pub fn with_elements(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        self.elements = elements.into_iter().collect();
        self
    }

    /// Builder-style transition list.
    pub fn with_transitions(mut self, transitions: impl IntoIterator<Item = Transition>) -> Self {
        self.transitions = transitions.into_iter().collect();
        self
    }

    /// Only a video track flagged `is_main` counts as the main track.
    pub fn is_main_track(&self) -> bool {
        self.is_main && self.kind == TrackKind::Video
    }

    /// Look up an element by id.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }
}

/// Position (offset from canvas center), uniform scale and rotation in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// Offset from the canvas center in canvas pixels.
    pub position: Vec2,
    /// Uniform scale.
    pub scale: f64,
    /// Clockwise rotation in degrees (y axis points down).
    pub rotate: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: 1.0,
            rotate: 0.0,
        }
    }
}

impl Transform {
    /// Identity transform moved to `(x, y)` relative to the canvas center.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::default()
        }
    }
}

fn one() -> f64 {
    1.0
}

fn white() -> String {
    "#ffffff".to_owned()
}

fn transparent() -> String {
    "transparent".to_owned()
}

fn normal() -> String {
    "normal".to_owned()
}

fn none() -> String {
    "none".to_owned()
}

fn sans_serif() -> String {
    "sans-serif".to_owned()
}

fn default_font_size() -> f64 {
    48.0
}

/// Typography and placement of a text element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    /// The string to draw.
    pub content: String,
    /// CSS font family list.
    #[serde(default = "sans_serif")]
    pub font_family: String,
    /// Font size at the reference canvas height.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// `normal`, `bold` or a numeric weight.
    #[serde(default = "normal")]
    pub font_weight: String,
    /// `normal` or `italic`.
    #[serde(default = "normal")]
    pub font_style: String,
    /// `none`, `underline` or `line-through`.
    #[serde(default = "none")]
    pub text_decoration: String,
    /// Fill color.
    #[serde(default = "white")]
    pub color: String,
    /// Box color behind the text; `transparent` draws no box.
    #[serde(default = "transparent")]
    pub background_color: String,
    /// Placement.
    #[serde(default)]
    pub transform: Transform,
    /// Opacity in `[0, 1]`.
    #[serde(default = "one")]
    pub opacity: f64,
}

impl TextContent {
    /// White sans-serif text at the default size.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_family: sans_serif(),
            font_size: default_font_size(),
            font_weight: normal(),
            font_style: normal(),
            text_decoration: none(),
            color: white(),
            background_color: transparent(),
            transform: Transform::default(),
            opacity: 1.0,
        }
    }
}

/// Type-specific payload of an [`Element`], tagged by `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum ElementContent {
    /// A video clip.
    Video {
        /// Referenced media asset.
        media_id: String,
        /// Placement.
        #[serde(default)]
        transform: Transform,
        /// Opacity in `[0, 1]`.
        #[serde(default = "one")]
        opacity: f64,
        /// Source seconds advanced per timeline second.
        #[serde(default = "one")]
        playback_rate: f64,
    },
    /// A still image.
    Image {
        /// Referenced media asset.
        media_id: String,
        /// Placement.
        #[serde(default)]
        transform: Transform,
        /// Opacity in `[0, 1]`.
        #[serde(default = "one")]
        opacity: f64,
    },
    /// Text.
    Text(TextContent),
    /// An icon drawn from an icon set.
    Sticker {
        /// Icon reference resolved through an [`IconSource`](crate::IconSource).
        icon_name: String,
        /// Tint color; empty keeps the icon's own colors.
        #[serde(default)]
        color: String,
        /// Placement.
        #[serde(default)]
        transform: Transform,
        /// Opacity in `[0, 1]`.
        #[serde(default = "one")]
        opacity: f64,
    },
    /// Audio; never rendered or hit.
    Audio {
        /// Referenced media asset, if any.
        #[serde(default)]
        media_id: Option<String>,
    },
}

/// A single timed unit of content on a track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Element identity.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Timeline start in seconds (`>= 0`).
    pub start_time: f64,
    /// Visible duration in seconds (`> 0`).
    pub duration: f64,
    /// Offset into the source at which playback starts.
    #[serde(default)]
    pub trim_start: f64,
    /// Amount trimmed from the end of the source.
    #[serde(default)]
    pub trim_end: f64,
    /// Hidden elements are neither rendered nor hit-tested.
    #[serde(default)]
    pub hidden: bool,
    /// Type-specific payload.
    #[serde(flatten)]
    pub content: ElementContent,
}

impl Element {
    /// Create a visible element with no trims.
    pub fn new(
        id: impl Into<String>,
        start_time: f64,
        duration: f64,
        content: ElementContent,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            start_time,
            duration,
            trim_start: 0.0,
            trim_end: 0.0,
            hidden: false,
            content,
        }
    }

    /// Video element with identity transform and playback rate 1.
    pub fn video(id: impl Into<String>, media_id: impl Into<String>, start: f64, dur: f64) -> Self {
        Self::new(
            id,
            start,
            dur,
            ElementContent::Video {
                media_id: media_id.into(),
                transform: Transform::default(),
                opacity: 1.0,
                playback_rate: 1.0,
            },
        )
    }

    /// Image element with identity transform.
    pub fn image(id: impl Into<String>, media_id: impl Into<String>, start: f64, dur: f64) -> Self {
        Self::new(
            id,
            start,
            dur,
            ElementContent::Image {
                media_id: media_id.into(),
                transform: Transform::default(),
                opacity: 1.0,
            },
        )
    }

    /// Text element.
    pub fn text(id: impl Into<String>, text: TextContent, start: f64, dur: f64) -> Self {
        Self::new(id, start, dur, ElementContent::Text(text))
    }

    /// Sticker element with no tint.
    pub fn sticker(id: impl Into<String>, icon: impl Into<String>, start: f64, dur: f64) -> Self {
        Self::new(
            id,
            start,
            dur,
            ElementContent::Sticker {
                icon_name: icon.into(),
                color: String::new(),
                transform: Transform::default(),
                opacity: 1.0,
            },
        )
    }

    /// Audio element.
    pub fn audio(id: impl Into<String>, start: f64, dur: f64) -> Self {
        Self::new(id, start, dur, ElementContent::Audio { media_id: None })
    }

    /// Builder-style transform override; no-op for audio.
    pub fn with_transform(mut self, t: Transform) -> Self {
        if let Some(slot) = self.transform_mut() {
            *slot = t;
        }
        self
    }

    /// Builder-style hidden flag.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// `start_time + duration`.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Visibility window is half-open: `[start_time, start_time + duration)`.
    pub fn is_visible_at(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time()
    }

    /// Everything except audio draws pixels.
    pub fn is_visual(&self) -> bool {
        !matches!(self.content, ElementContent::Audio { .. })
    }

    /// Video and image elements.
    pub fn is_media(&self) -> bool {
        matches!(
            self.content,
            ElementContent::Video { .. } | ElementContent::Image { .. }
        )
    }

    /// Referenced media asset id for video/image elements.
    pub fn media_id(&self) -> Option<&str> {
        match &self.content {
            ElementContent::Video { media_id, .. } | ElementContent::Image { media_id, .. } => {
                Some(media_id)
            }
            _ => None,
        }
    }

    /// Placement of a visual element.
    pub fn transform(&self) -> Option<&Transform> {
        match &self.content {
            ElementContent::Video { transform, .. }
            | ElementContent::Image { transform, .. }
            | ElementContent::Sticker { transform, .. } => Some(transform),
            ElementContent::Text(t) => Some(&t.transform),
            ElementContent::Audio { .. } => None,
        }
    }

    fn transform_mut(&mut self) -> Option<&mut Transform> {
        match &mut self.content {
            ElementContent::Video { transform, .. }
            | ElementContent::Image { transform, .. }
            | ElementContent::Sticker { transform, .. } => Some(transform),
            ElementContent::Text(t) => Some(&mut t.transform),
            ElementContent::Audio { .. } => None,
        }
    }

    /// Opacity of a visual element.
    pub fn opacity(&self) -> Option<f64> {
        match &self.content {
            ElementContent::Video { opacity, .. }
            | ElementContent::Image { opacity, .. }
            | ElementContent::Sticker { opacity, .. } => Some(*opacity),
            ElementContent::Text(t) => Some(t.opacity),
            ElementContent::Audio { .. } => None,
        }
    }
}

/// Media kind of an asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Video.
    Video,
    /// Still image.
    Image,
    /// Audio.
    Audio,
}

/// External media reference with natural pixel size and a displayable handle.
///
/// `width`/`height` of 0 mean "unknown" and degrade to the canvas size.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    /// Asset identity referenced by elements.
    pub id: String,
    /// Asset type.
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Natural width in pixels, 0 when unknown.
    #[serde(default)]
    pub width: u32,
    /// Natural height in pixels, 0 when unknown.
    #[serde(default)]
    pub height: u32,
    /// Frame provider; `None` while the asset is not yet resolvable.
    #[serde(skip)]
    pub source: Option<Arc<dyn MediaSource>>,
}

impl MediaAsset {
    /// Create an unresolved asset of known size.
    pub fn new(id: impl Into<String>, kind: MediaKind, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            kind,
            width,
            height,
            source: None,
        }
    }

    /// Attach a frame provider.
    pub fn with_source(mut self, source: Arc<dyn MediaSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Whether an element referencing this asset can be drawn: a resolved source on a visual kind.
    pub fn is_displayable(&self) -> bool {
        self.kind != MediaKind::Audio && self.source.is_some()
    }
}

impl fmt::Debug for MediaAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaAsset")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("resolved", &self.source.is_some())
            .finish()
    }
}

/// A timed blend/warp between two adjacent elements of a video track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    /// Transition identity.
    pub id: String,
    /// Blend/warp function.
    #[serde(rename = "type")]
    pub kind: TransitionKind,
    /// Window length in seconds, centered on the junction.
    pub duration: f64,
    /// Outgoing element.
    pub from_element_id: String,
    /// Incoming element.
    pub to_element_id: String,
}

impl Transition {
    /// Create a transition with a freshly generated id.
    pub fn new(
        kind: TransitionKind,
        duration: f64,
        from_element_id: impl Into<String>,
        to_element_id: impl Into<String>,
    ) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);

        let from_element_id = from_element_id.into();
        let to_element_id = to_element_id.into();
        let n = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("tr-{from_element_id}-{to_element_id}-{n}"),
            kind,
            duration,
            from_element_id,
            to_element_id,
        }
    }

    /// Builder-style id override.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Return `true` when this transition links `from -> to`.
    pub fn links(&self, from: &str, to: &str) -> bool {
        self.from_element_id == from && self.to_element_id == to
    }
}

/// What the canvas shows beneath all content.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum Background {
    /// Flat color; `transparent` draws nothing.
    Color {
        /// CSS color.
        color: String,
    },
    /// Blurred copy of the content.
    Blur {
        /// Blur radius in pixels.
        #[serde(default)]
        blur_intensity: Option<f64>,
    },
    /// No background.
    #[default]
    None,
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
