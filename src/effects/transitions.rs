use serde::{Deserialize, Serialize};

/// Transition length applied when the editor adds one without choosing.
pub const DEFAULT_TRANSITION_DURATION: f64 = 0.5;

/// Edge a wipe grows from or a slide moves toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward / from the left edge.
    Left,
    /// Toward / from the right edge.
    Right,
    /// Toward / from the top edge.
    Up,
    /// Toward / from the bottom edge.
    Down,
}

/// Preset grouping used by transition pickers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionCategory {
    /// Fade and dissolve.
    Fade,
    /// Wipes.
    Wipe,
    /// Slides.
    Slide,
    /// Zooms.
    Zoom,
}

impl TransitionCategory {
    /// All categories in picker order.
    pub const ALL: [Self; 4] = [Self::Fade, Self::Wipe, Self::Slide, Self::Zoom];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Fade => "Fade",
            Self::Wipe => "Wipe",
            Self::Slide => "Slide",
            Self::Zoom => "Zoom",
        }
    }
}

/// Blend/warp function of a transition.
///
/// Serialized as the editor's kebab-case names (`"wipe-left"`, `"zoom-in"`, ...). Unknown names
/// deserialize to [`TransitionKind::Fade`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// A fades out while B fades in.
    #[default]
    Fade,
    /// A stays opaque while B fades in on a smoothstep curve.
    Dissolve,
    /// B revealed by a rectangle growing from the right edge.
    WipeLeft,
    /// B revealed by a rectangle growing from the left edge.
    WipeRight,
    /// B revealed by a rectangle growing from the bottom edge.
    WipeUp,
    /// B revealed by a rectangle growing from the top edge.
    WipeDown,
    /// A leaves to the left, B follows from the right.
    SlideLeft,
    /// A leaves to the right, B follows from the left.
    SlideRight,
    /// A leaves upward, B follows from below.
    SlideUp,
    /// A leaves downward, B follows from above.
    SlideDown,
    /// A grows to 1.5x while fading out; B fades in at native scale.
    ZoomIn,
    /// A fades out; B grows from 0.5x to native while fading in.
    ZoomOut,
}

impl TransitionKind {
    /// All kinds in preset order.
    pub const ALL: [Self; 12] = [
        Self::Fade,
        Self::Dissolve,
        Self::WipeLeft,
        Self::WipeRight,
        Self::WipeUp,
        Self::WipeDown,
        Self::SlideLeft,
        Self::SlideRight,
        Self::SlideUp,
        Self::SlideDown,
        Self::ZoomIn,
        Self::ZoomOut,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::Dissolve => "dissolve",
            Self::WipeLeft => "wipe-left",
            Self::WipeRight => "wipe-right",
            Self::WipeUp => "wipe-up",
            Self::WipeDown => "wipe-down",
            Self::SlideLeft => "slide-left",
            Self::SlideRight => "slide-right",
            Self::SlideUp => "slide-up",
            Self::SlideDown => "slide-down",
            Self::ZoomIn => "zoom-in",
            Self::ZoomOut => "zoom-out",
        }
    }

    /// Parse a wire name, falling back to [`TransitionKind::Fade`].
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .unwrap_or_else(|| {
                tracing::debug!(kind = s, "unknown transition kind, using fade");
                Self::Fade
            })
    }

    /// Preset label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Fade => "Fade",
            Self::Dissolve => "Dissolve",
            Self::WipeLeft => "Wipe Left",
            Self::WipeRight => "Wipe Right",
            Self::WipeUp => "Wipe Up",
            Self::WipeDown => "Wipe Down",
            Self::SlideLeft => "Slide Left",
            Self::SlideRight => "Slide Right",
            Self::SlideUp => "Slide Up",
            Self::SlideDown => "Slide Down",
            Self::ZoomIn => "Zoom In",
            Self::ZoomOut => "Zoom Out",
        }
    }

    /// Preset category.
    pub fn category(self) -> TransitionCategory {
        match self {
            Self::Fade | Self::Dissolve => TransitionCategory::Fade,
            Self::WipeLeft | Self::WipeRight | Self::WipeUp | Self::WipeDown => {
                TransitionCategory::Wipe
            }
            Self::SlideLeft | Self::SlideRight | Self::SlideUp | Self::SlideDown => {
                TransitionCategory::Slide
            }
            Self::ZoomIn | Self::ZoomOut => TransitionCategory::Zoom,
        }
    }

    /// Wipe or slide direction, if any.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::WipeLeft | Self::SlideLeft => Some(Direction::Left),
            Self::WipeRight | Self::SlideRight => Some(Direction::Right),
            Self::WipeUp | Self::SlideUp => Some(Direction::Up),
            Self::WipeDown | Self::SlideDown => Some(Direction::Down),
            _ => None,
        }
    }
}

impl Serialize for TransitionKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransitionKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// Normalized position inside `[start, start + duration)`, or `None` outside the window.
pub fn transition_progress(time: f64, start: f64, duration: f64) -> Option<f64> {
    if !(duration.is_finite() && duration > 0.0) {
        return None;
    }
    if time < start || time >= start + duration {
        return None;
    }
    Some(((time - start) / duration).clamp(0.0, 1.0))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
