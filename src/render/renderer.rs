use crate::assets::media::MediaFrame;
use crate::effects::blur::{BlurParams, blur_rgba8_premul_in_place};
use crate::effects::composite::{fill_over_in_place, over_in_place};
use crate::foundation::core::{Affine, Rgba8Premul};
use crate::foundation::error::{ClipstackError, ClipstackResult};
use crate::render::surface::{Surface, surface_dims};
use crate::render::surface_pool::{SurfacePool, SurfacePoolOpts, SurfacePoolStats};
use crate::scene::node::SceneTree;

/// CPU renderer for [`SceneTree`]s.
///
/// Owns a reusable `vello_cpu` context, a pool of scratch surfaces and blur scratch memory, so
/// rendering consecutive frames does not reallocate. One renderer per thread.
pub struct Renderer {
    ctx: Option<vello_cpu::RenderContext>,
    pool: SurfacePool,
    blur_tmp: Vec<u8>,
    view: Affine,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Renderer with default pool limits.
    pub fn new() -> Self {
        Self::with_pool_opts(SurfacePoolOpts::default())
    }

    /// Renderer with explicit pool limits.
    pub fn with_pool_opts(opts: SurfacePoolOpts) -> Self {
        Self {
            ctx: None,
            pool: SurfacePool::new(opts),
            blur_tmp: Vec::new(),
            view: Affine::IDENTITY,
        }
    }

    /// Scratch-surface allocation counters.
    pub fn pool_stats(&self) -> SurfacePoolStats {
        self.pool.stats()
    }

    /// Render `scene` at `time` into `target`, replacing its contents.
    ///
    /// Canvas coordinates are stretched to the target's pixel size, so previews can render at a
    /// lower resolution than the project canvas.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(time = time, width = target.width(), height = target.height(), nodes = scene.children.len())
    )]
    pub fn render_frame(
        &mut self,
        scene: &SceneTree,
        target: &mut Surface,
        time: f64,
    ) -> ClipstackResult<()> {
        if scene.canvas.is_empty() {
            return Err(ClipstackError::validation("scene canvas must be non-empty"));
        }
        target.clear();
        self.view = Affine::scale_non_uniform(
            f64::from(target.width()) / scene.canvas.width_f64(),
            f64::from(target.height()) / scene.canvas.height_f64(),
        );
        for node in &scene.children {
            node.render(self, target, time)?;
        }
        Ok(())
    }

    /// Render `scene` at `time` into a new canvas-sized surface.
    pub fn render(&mut self, scene: &SceneTree, time: f64) -> ClipstackResult<Surface> {
        let mut target = Surface::new(scene.canvas.width, scene.canvas.height)?;
        self.render_frame(scene, &mut target, time)?;
        Ok(target)
    }

    /// Uniform-ish pixels per canvas unit of the current view.
    pub(crate) fn view_scale(&self) -> f64 {
        let [a, b, c, d, _, _] = self.view.as_coeffs();
        (a * a + b * b).sqrt().max((c * c + d * d).sqrt())
    }

    /// Draw `frame` stretched over content box `[0, w] x [0, h]`, placed by `placement` (canvas
    /// space), onto `target` with source-over at `opacity`.
    pub(crate) fn draw_frame(
        &mut self,
        target: &mut Surface,
        frame: &MediaFrame,
        placement: Affine,
        content_size: (f64, f64),
        opacity: f64,
    ) -> ClipstackResult<()> {
        let opacity = opacity.clamp(0.0, 1.0);
        let (cw, ch) = content_size;
        if opacity <= 0.0 || cw <= 0.0 || ch <= 0.0 {
            return Ok(());
        }
        let (w, h) = surface_dims(target.width(), target.height())?;
        let (fw, fh) = (f64::from(frame.width()), f64::from(frame.height()));
        let xf = self.view * placement * Affine::scale_non_uniform(cw / fw, ch / fh);
        let paint = frame.paint();

        let mut layer = self.pool.borrow(target.width(), target.height())?;
        layer.clear();
        let drawn = self.with_ctx_mut(w, h, |_, ctx| {
            ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(affine_to_cpu(xf));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, fw, fh));
            ctx.flush();
            ctx.render_to_pixmap(layer.pixmap_mut());
            Ok(())
        });
        let out = drawn.and_then(|()| over_in_place(target.data_mut(), layer.data(), opacity as f32));
        self.pool.release(layer);
        out
    }

    /// Source-over of a solid color across the whole target.
    pub(crate) fn fill(&mut self, target: &mut Surface, color: Rgba8Premul, opacity: f64) {
        fill_over_in_place(
            target.data_mut(),
            color.to_array(),
            opacity.clamp(0.0, 1.0) as f32,
        );
    }

    /// Blur `surface` in place.
    pub(crate) fn blur(&mut self, surface: &mut Surface, params: BlurParams) -> ClipstackResult<()> {
        if params.radius == 0 {
            return Ok(());
        }
        let (w, h) = (surface.width(), surface.height());
        blur_rgba8_premul_in_place(
            surface.data_mut(),
            &mut self.blur_tmp,
            w,
            h,
            params.radius,
            params.sigma,
        )
    }

    /// A cleared scratch surface; hand it back with [`Renderer::release_scratch`].
    pub(crate) fn borrow_scratch(&mut self, width: u32, height: u32) -> ClipstackResult<Surface> {
        let mut s = self.pool.borrow(width, height)?;
        s.clear();
        Ok(s)
    }

    pub(crate) fn release_scratch(&mut self, surface: Surface) {
        self.pool.release(surface);
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> ClipstackResult<R>,
    ) -> ClipstackResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx);
        self.ctx = Some(ctx);
        out
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("pool", &self.pool.stats())
            .finish_non_exhaustive()
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
