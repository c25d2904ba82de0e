/// Flat-color and blurred backgrounds.
pub mod background;
/// Snapshot to scene tree compilation.
pub mod builder;
/// Video and image nodes.
pub mod media;
/// The scene node enum and tree root.
pub mod node;
/// Icon sticker nodes.
pub mod sticker;
/// Text nodes.
pub mod text;
/// Transition nodes blending two media nodes.
pub mod transition;
