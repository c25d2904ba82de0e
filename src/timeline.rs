/// Tracks, elements, transitions, media assets and backgrounds.
pub mod model;
/// Back-to-front layering of tracks and elements.
pub mod order;
/// Playback-rate helpers.
pub mod speed;
/// Adjacency and the transition index.
pub mod transitions;
