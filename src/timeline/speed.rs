use crate::foundation::error::{ClipstackError, ClipstackResult};

/// Slowest supported playback rate.
pub const MIN_PLAYBACK_RATE: f64 = 0.25;
/// Fastest supported playback rate.
pub const MAX_PLAYBACK_RATE: f64 = 4.0;

/// Clamp `rate` into `[MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE]`; non-finite rates become 1.
pub fn clamp_playback_rate(rate: f64) -> f64 {
    if !rate.is_finite() {
        return 1.0;
    }
    rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE)
}

/// Timeline duration of a clip after changing its playback rate from `old_rate` to `new_rate`.
pub fn duration_after_speed_change(
    duration: f64,
    old_rate: f64,
    new_rate: f64,
) -> ClipstackResult<f64> {
    if !(old_rate.is_finite() && old_rate > 0.0 && new_rate.is_finite() && new_rate > 0.0) {
        return Err(ClipstackError::validation(format!(
            "playback rates must be finite and > 0 (old={old_rate}, new={new_rate})"
        )));
    }
    Ok(duration * (old_rate / new_rate))
}

/// Source time shown at timeline `time` for a clip starting at `start_time`.
pub fn source_time(time: f64, start_time: f64, trim_start: f64, playback_rate: f64) -> f64 {
    trim_start + (time - start_time) * playback_rate
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/speed.rs"]
mod tests;
