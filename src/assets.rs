/// CSS color strings.
pub mod color;
/// Icon lookup for stickers.
pub mod icons;
/// Frame providers for video and image elements.
pub mod media;
/// SVG parsing and rasterization.
pub mod svg_raster;
