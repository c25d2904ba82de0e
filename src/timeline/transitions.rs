//! Adjacency inference and the `(from, to) -> Transition` index of a video track.
//!
//! All operations are pure: they borrow a track and return new values, leaving persistence and
//! undo snapshotting to the caller.

use std::borrow::Cow;
use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::timeline::model::{Element, Track, Transition};

/// Max gap (seconds) between an element's end and the next element's start for the two to be
/// considered adjacent. The comparison is strict: a gap of exactly this value is not adjacent.
pub const ADJACENCY_EPSILON: f64 = 0.05;

/// Two consecutive elements whose junction gap is below the adjacency epsilon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdjacentPair<'a> {
    /// Earlier element.
    pub from: &'a Element,
    /// Later element.
    pub to: &'a Element,
}

/// Deterministic element order shared by the builder, the hit tester and adjacency:
/// start time, then id.
pub fn cmp_start_then_id(a: &Element, b: &Element) -> Ordering {
    a.start_time
        .total_cmp(&b.start_time)
        .then_with(|| a.id.cmp(&b.id))
}

/// Junction gaps are compared in whole microseconds, so decimal timestamps such as `5.0 -> 5.05`
/// land exactly on the epsilon instead of a float rounding error below it.
const GAP_TICKS_PER_SECOND: f64 = 1_000_000.0;

fn to_ticks(seconds: f64) -> f64 {
    (seconds * GAP_TICKS_PER_SECOND).round()
}

/// Return `true` when `b` starts strictly within `epsilon` of `a`'s end.
pub fn are_elements_adjacent(a: &Element, b: &Element, epsilon: f64) -> bool {
    to_ticks((b.start_time - a.end_time()).abs()) < to_ticks(epsilon)
}

/// Adjacent `(from, to)` pairs among the track's visual elements, using [`ADJACENCY_EPSILON`].
///
/// The result does not depend on the order of `track.elements`.
pub fn find_adjacent_pairs(track: &Track) -> Vec<AdjacentPair<'_>> {
    find_adjacent_pairs_with(track, ADJACENCY_EPSILON)
}

/// [`find_adjacent_pairs`] with an explicit epsilon.
pub fn find_adjacent_pairs_with(track: &Track, epsilon: f64) -> Vec<AdjacentPair<'_>> {
    let mut sorted: SmallVec<[&Element; 16]> =
        track.elements.iter().filter(|e| e.is_visual()).collect();
    sorted.sort_by(|a, b| cmp_start_then_id(a, b));

    sorted
        .windows(2)
        .filter(|w| are_elements_adjacent(w[0], w[1], epsilon))
        .map(|w| AdjacentPair {
            from: w[0],
            to: w[1],
        })
        .collect()
}

/// Registered transition for `from_id -> to_id`, if any. Does not check adjacency.
pub fn get_transition_for_pair<'a>(
    track: &'a Track,
    from_id: &str,
    to_id: &str,
) -> Option<&'a Transition> {
    track.transitions.iter().find(|t| t.links(from_id, to_id))
}

/// Insert `transition`, replacing any existing transition for the same pair in place.
pub fn add_transition_to_track(track: &Track, transition: Transition) -> Track {
    let mut out = track.clone();
    match out
        .transitions
        .iter_mut()
        .find(|t| t.links(&transition.from_element_id, &transition.to_element_id))
    {
        Some(slot) => *slot = transition,
        None => out.transitions.push(transition),
    }
    out
}

/// Drop the transition with id `transition_id`.
pub fn remove_transition_from_track(track: &Track, transition_id: &str) -> Track {
    let mut out = track.clone();
    out.transitions.retain(|t| t.id != transition_id);
    out
}

/// Keep only transitions whose endpoints both exist and are still adjacent.
///
/// Idempotent. An already-clean track comes back as [`Cow::Borrowed`] so callers can detect the
/// no-op without comparing contents.
pub fn cleanup_transitions(track: &Track) -> Cow<'_, Track> {
    cleanup_transitions_with(track, ADJACENCY_EPSILON)
}

/// [`cleanup_transitions`] with an explicit epsilon.
pub fn cleanup_transitions_with(track: &Track, epsilon: f64) -> Cow<'_, Track> {
    if track.transitions.is_empty() {
        return Cow::Borrowed(track);
    }

    let pairs = find_adjacent_pairs_with(track, epsilon);
    let is_valid = |t: &Transition| {
        track.element(&t.from_element_id).is_some()
            && track.element(&t.to_element_id).is_some()
            && pairs
                .iter()
                .any(|p| p.from.id == t.from_element_id && p.to.id == t.to_element_id)
    };

    if track.transitions.iter().all(is_valid) {
        return Cow::Borrowed(track);
    }

    let mut out = track.clone();
    out.transitions.retain(|t| is_valid(t));
    tracing::debug!(
        track = %track.id,
        removed = track.transitions.len() - out.transitions.len(),
        "pruned stale transitions"
    );
    Cow::Owned(out)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/transitions.rs"]
mod tests;
