use crate::foundation::error::{ClipstackError, ClipstackResult};

/// Environment variable overriding [`SceneConfig::adjacency_epsilon`].
pub const ENV_ADJACENCY_EPSILON: &str = "CLIPSTACK_ADJACENCY_EPSILON";
/// Environment variable overriding [`SceneConfig::text_reference_height`].
pub const ENV_TEXT_REFERENCE_HEIGHT: &str = "CLIPSTACK_TEXT_REFERENCE_HEIGHT";
/// Environment variable overriding [`SceneConfig::default_blur_intensity`].
pub const ENV_BLUR_INTENSITY: &str = "CLIPSTACK_BLUR_INTENSITY";

/// Tunables shared by the scene builder, the renderer and the hit tester.
///
/// Builder and hit tester must run with the same values or selection drifts from the visuals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    /// Max gap (seconds) between one element's end and the next one's start to count as adjacent.
    pub adjacency_epsilon: f64,
    /// Canvas height at which a text element's `font_size` is used verbatim.
    pub text_reference_height: f64,
    /// Logical edge length of a sticker before contain-fit scaling.
    pub sticker_source_px: f64,
    /// Blur radius used when a blur background omits its intensity.
    pub default_blur_intensity: f64,
    /// How far before its end the outgoing element is sampled during a transition.
    pub outgoing_clamp_epsilon: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            adjacency_epsilon: crate::timeline::transitions::ADJACENCY_EPSILON,
            text_reference_height: crate::geometry::TEXT_REFERENCE_HEIGHT,
            sticker_source_px: crate::geometry::STICKER_SOURCE_PX,
            default_blur_intensity: crate::scene::node::DEFAULT_BLUR_INTENSITY,
            outgoing_clamp_epsilon: 1.0 / 1000.0,
        }
    }
}

impl SceneConfig {
    /// Defaults overlaid with `CLIPSTACK_*` environment variables.
    pub fn from_env() -> ClipstackResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values returned by `lookup` for the `CLIPSTACK_*` keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClipstackResult<Self> {
        let mut cfg = Self::default();
        if let Some(v) = parse_positive(&lookup, ENV_ADJACENCY_EPSILON)? {
            cfg.adjacency_epsilon = v;
        }
        if let Some(v) = parse_positive(&lookup, ENV_TEXT_REFERENCE_HEIGHT)? {
            cfg.text_reference_height = v;
        }
        if let Some(v) = parse_positive(&lookup, ENV_BLUR_INTENSITY)? {
            cfg.default_blur_intensity = v;
        }
        Ok(cfg)
    }
}

fn parse_positive(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> ClipstackResult<Option<f64>> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let v: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ClipstackError::validation(format!("{key} must be a number, got '{raw}'")))?;
    if !v.is_finite() || v <= 0.0 {
        return Err(ClipstackError::validation(format!(
            "{key} must be finite and > 0, got {v}"
        )));
    }
    Ok(Some(v))
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
