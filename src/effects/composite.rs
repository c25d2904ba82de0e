//! Premultiplied RGBA8 compositing kernels, including the twelve transition blends.
//!
//! Every transition draws the outgoing buffer `a` and then the incoming buffer `b` onto `dst`
//! with source-over, so whatever `dst` already holds (background, lower tracks) shows through.

use crate::effects::transitions::{Direction, TransitionKind};
use crate::foundation::error::{ClipstackError, ClipstackResult};
use crate::foundation::math::{mul_div255_u8, opacity_to_u8, smoothstep01};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over of `src` scaled by `opacity` onto `dst`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    over_q(dst, src, opacity_to_u8(opacity))
}

fn over_q(dst: PremulRgba8, src: PremulRgba8, op: u16) -> PremulRgba8 {
    if op == 0 || src[3] == 0 {
        return dst;
    }
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Source-over of a whole buffer onto an equally sized one.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> ClipstackResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ClipstackError::evaluation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    let op = opacity_to_u8(opacity);
    if op == 0 {
        return Ok(());
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over_q([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], op);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Source-over of a solid premultiplied color onto every pixel.
pub fn fill_over_in_place(dst: &mut [u8], color: PremulRgba8, opacity: f32) {
    let op = opacity_to_u8(opacity);
    if op == 0 || color[3] == 0 {
        return;
    }
    for d in dst.chunks_exact_mut(4) {
        let out = over_q([d[0], d[1], d[2], d[3]], color, op);
        d.copy_from_slice(&out);
    }
}

/// Draw the `a -> b` transition of `kind` at `progress` onto `dst`.
///
/// All three buffers are `width * height * 4` premultiplied bytes. `progress` is clamped to
/// `[0, 1]`; at 0 the result equals drawing `a` alone.
pub fn composite_transition(
    dst: &mut [u8],
    a: &[u8],
    b: &[u8],
    width: u32,
    height: u32,
    kind: TransitionKind,
    progress: f64,
) -> ClipstackResult<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ClipstackError::evaluation("transition buffer size overflow"))?;
    if dst.len() != expected || a.len() != expected || b.len() != expected {
        return Err(ClipstackError::evaluation(
            "composite_transition expects buffers matching width*height*4",
        ));
    }

    let p = progress.clamp(0.0, 1.0);
    let layer = Layer { width, height };
    match kind {
        TransitionKind::Fade => {
            over_in_place(dst, a, (1.0 - p) as f32)?;
            over_in_place(dst, b, p as f32)?;
        }
        TransitionKind::Dissolve => {
            over_in_place(dst, a, 1.0)?;
            over_in_place(dst, b, smoothstep01(p) as f32)?;
        }
        TransitionKind::WipeLeft
        | TransitionKind::WipeRight
        | TransitionKind::WipeUp
        | TransitionKind::WipeDown => {
            over_in_place(dst, a, 1.0)?;
            let clip = wipe_clip(kind.direction().unwrap_or(Direction::Left), p, width, height);
            layer.over_mapped(dst, b, 255, |x, y| {
                clip.contains_pixel(x, y).then_some((x as i32, y as i32))
            });
        }
        TransitionKind::SlideLeft
        | TransitionKind::SlideRight
        | TransitionKind::SlideUp
        | TransitionKind::SlideDown => {
            let ((adx, ady), (bdx, bdy)) =
                slide_offsets(kind.direction().unwrap_or(Direction::Left), p, width, height);
            layer.over_mapped(dst, a, 255, |x, y| Some((x as i32 - adx, y as i32 - ady)));
            layer.over_mapped(dst, b, 255, |x, y| Some((x as i32 - bdx, y as i32 - bdy)));
        }
        TransitionKind::ZoomIn => {
            let op_a = opacity_to_u8((1.0 - p) as f32);
            layer.over_scaled(dst, a, 1.0 + 0.5 * p, op_a);
            over_in_place(dst, b, p as f32)?;
        }
        TransitionKind::ZoomOut => {
            over_in_place(dst, a, (1.0 - p) as f32)?;
            let op_b = opacity_to_u8(p as f32);
            layer.over_scaled(dst, b, 0.5 + 0.5 * p, op_b);
        }
    }
    Ok(())
}

/// Axis-aligned clip in pixel space; a pixel is inside when its center is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelClip {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl PixelClip {
    /// Center-sampling containment test.
    pub fn contains_pixel(&self, x: u32, y: u32) -> bool {
        let cx = f64::from(x) + 0.5;
        let cy = f64::from(y) + 0.5;
        cx >= self.x && cx < self.x + self.w && cy >= self.y && cy < self.y + self.h
    }
}

/// Region of the incoming buffer revealed by a wipe at progress `p`.
pub fn wipe_clip(dir: Direction, p: f64, width: u32, height: u32) -> PixelClip {
    let w = f64::from(width);
    let h = f64::from(height);
    match dir {
        Direction::Left => PixelClip {
            x: w * (1.0 - p),
            y: 0.0,
            w: w * p,
            h,
        },
        Direction::Right => PixelClip {
            x: 0.0,
            y: 0.0,
            w: w * p,
            h,
        },
        Direction::Up => PixelClip {
            x: 0.0,
            y: h * (1.0 - p),
            w,
            h: h * p,
        },
        Direction::Down => PixelClip {
            x: 0.0,
            y: 0.0,
            w,
            h: h * p,
        },
    }
}

/// Whole-pixel translations `(a, b)` of a slide; the two layers always abut.
pub fn slide_offsets(
    dir: Direction,
    p: f64,
    width: u32,
    height: u32,
) -> ((i32, i32), (i32, i32)) {
    let w = width as i32;
    let h = height as i32;
    let ox = (p * f64::from(width)).round() as i32;
    let oy = (p * f64::from(height)).round() as i32;
    match dir {
        Direction::Left => ((-ox, 0), (w - ox, 0)),
        Direction::Right => ((ox, 0), (-w + ox, 0)),
        Direction::Up => ((0, -oy), (0, h - oy)),
        Direction::Down => ((0, oy), (0, -h + oy)),
    }
}

struct Layer {
    width: u32,
    height: u32,
}

impl Layer {
    /// Draw `src` onto `dst`, fetching each destination pixel from `map(x, y)`.
    /// Unmapped or out-of-bounds source pixels leave `dst` untouched.
    fn over_mapped(
        &self,
        dst: &mut [u8],
        src: &[u8],
        op: u16,
        map: impl Fn(u32, u32) -> Option<(i32, i32)>,
    ) {
        if op == 0 {
            return;
        }
        for y in 0..self.height {
            for x in 0..self.width {
                let Some((sx, sy)) = map(x, y) else {
                    continue;
                };
                let Some(s) = sample_px(src, self.width, self.height, sx, sy) else {
                    continue;
                };
                let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
                let d = &mut dst[idx..idx + 4];
                let out = over_q([d[0], d[1], d[2], d[3]], s, op);
                d.copy_from_slice(&out);
            }
        }
    }

    /// Draw `src` scaled by `scale` about the buffer center, nearest-neighbour sampled.
    fn over_scaled(&self, dst: &mut [u8], src: &[u8], scale: f64, op: u16) {
        let s = scale.max(1e-6);
        let cx = f64::from(self.width) / 2.0;
        let cy = f64::from(self.height) / 2.0;
        self.over_mapped(dst, src, op, |x, y| {
            let sx = cx + (f64::from(x) + 0.5 - cx) / s - 0.5;
            let sy = cy + (f64::from(y) + 0.5 - cy) / s - 0.5;
            Some((sx.round() as i32, sy.round() as i32))
        });
    }
}

fn sample_px(src: &[u8], width: u32, height: u32, x: i32, y: i32) -> Option<PremulRgba8> {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return None;
    }
    let idx = ((y as usize) * (width as usize) + (x as usize)) * 4;
    Some([src[idx], src[idx + 1], src[idx + 2], src[idx + 3]])
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
