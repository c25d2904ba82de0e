//! Clipstack is the frame-compositing core of a timeline video editor.
//!
//! Given an immutable snapshot of tracks, elements, transitions and media assets, it:
//!
//! - compiles the snapshot into a tree of scene nodes ([`build_scene`])
//! - renders that tree into a premultiplied RGBA8 [`Surface`] at any instant ([`Renderer`])
//! - answers "which element is under this point" with the same layering rules ([`hit_test`])
//!
//! The transition index ([`find_adjacent_pairs`], [`cleanup_transitions`], ...) is exposed as pure
//! functions so the editing layer keeps control over persistence and undo history.
//!
//! Pixels are **premultiplied RGBA8** end-to-end.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Media sources, colors, icon sources and SVG rasterization.
pub mod assets;
/// Tunable constants for scene building and hit testing.
pub mod config;
/// Transition kinds, compositing kernels and blur.
pub mod effects;
/// Contain-fit scaling, element bounds and rotated-rectangle containment.
pub mod geometry;
/// Surfaces, the CPU renderer and render coalescing.
pub mod render;
/// Scene nodes and the scene builder.
pub mod scene;
/// Timeline data model and the transition index.
pub mod timeline;

pub use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{ClipstackError, ClipstackResult};

pub use crate::assets::color::Color;
pub use crate::assets::icons::{IconSet, IconSource};
pub use crate::assets::media::{MediaFrame, MediaSource, StillImage};
pub use crate::config::SceneConfig;
pub use crate::effects::transitions::{
    DEFAULT_TRANSITION_DURATION, TransitionCategory, TransitionKind,
};
pub use crate::geometry::{HalfExtents, bounds_of, contain_fit_scale, point_in_rotated_rect};
pub use crate::hit::hit_test::{HitResult, hit_test, hit_test_with_config};
pub use crate::render::coalesce::{
    LayerSurface, RenderCoalescer, RenderFinish, RenderPass, RenderRequest, RenderState,
};
pub use crate::render::renderer::Renderer;
pub use crate::render::surface::{FrameRGBA, Surface};
pub use crate::render::surface_pool::{SurfacePoolOpts, SurfacePoolStats};
pub use crate::scene::builder::{SceneBuilder, build_scene};
pub use crate::scene::node::{SceneNode, SceneTree};
pub use crate::timeline::model::{
    Background, Element, ElementContent, MediaAsset, MediaKind, TextContent, Track, TrackKind,
    Transform, Transition,
};
pub use crate::timeline::order::tracks_back_to_front;
pub use crate::timeline::transitions::{
    ADJACENCY_EPSILON, AdjacentPair, add_transition_to_track, are_elements_adjacent,
    cleanup_transitions, find_adjacent_pairs, get_transition_for_pair, remove_transition_from_track,
};
