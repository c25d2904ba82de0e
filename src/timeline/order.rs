//! Layering rules shared by the scene builder and the hit tester.
//!
//! Back-to-front, main tracks come first so they always sit beneath everything else; within the
//! main group and within the non-main group, later list entries sit closer to the viewer. Hidden
//! tracks and hidden elements are excluded.

use smallvec::SmallVec;

use crate::timeline::model::{Element, Track};
use crate::timeline::transitions::cmp_start_then_id;

/// Visible tracks, back-to-front.
pub fn tracks_back_to_front(tracks: &[Track]) -> SmallVec<[&Track; 8]> {
    let visible = || tracks.iter().filter(|t| !t.hidden);
    visible()
        .filter(|t| t.is_main_track())
        .chain(visible().filter(|t| !t.is_main_track()))
        .collect()
}

/// Visible, non-audio elements of `track` ordered by `(start_time, id)`.
pub fn ordered_visible_elements(track: &Track) -> SmallVec<[&Element; 16]> {
    let mut elements: SmallVec<[&Element; 16]> = track
        .elements
        .iter()
        .filter(|e| !e.hidden && e.is_visual())
        .collect();
    elements.sort_by(|a, b| cmp_start_then_id(a, b));
    elements
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/order.rs"]
mod tests;
