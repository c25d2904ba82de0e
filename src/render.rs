/// At-most-one in-flight render per surface.
pub mod coalesce;
/// CPU renderer driving scene trees.
pub mod renderer;
/// Premultiplied RGBA8 render targets.
pub mod surface;
/// Scratch-surface reuse.
pub mod surface_pool;
