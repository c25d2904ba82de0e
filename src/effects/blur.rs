use crate::foundation::error::{ClipstackError, ClipstackResult};

/// Largest kernel radius a blur background will use.
pub const MAX_BLUR_RADIUS: u32 = 64;

/// Kernel radius and sigma derived from a blur intensity (CSS `blur(<intensity>px)`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlurParams {
    /// Kernel half-width in pixels.
    pub radius: u32,
    /// Gaussian standard deviation in pixels.
    pub sigma: f32,
}

impl BlurParams {
    /// `sigma = intensity`, `radius = ceil(3 * sigma)` capped at [`MAX_BLUR_RADIUS`].
    /// Non-positive or non-finite intensities disable the blur.
    pub fn from_intensity(intensity: f64) -> Self {
        if !intensity.is_finite() || intensity <= 0.0 {
            return Self {
                radius: 0,
                sigma: 1.0,
            };
        }
        let radius = ((intensity * 3.0).ceil() as u32).clamp(1, MAX_BLUR_RADIUS);
        Self {
            radius,
            sigma: intensity as f32,
        }
    }
}

/// Separable gaussian blur of a premultiplied RGBA8 buffer; edges clamp.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> ClipstackResult<Vec<u8>> {
    let mut out = src.to_vec();
    let mut tmp = Vec::new();
    blur_rgba8_premul_in_place(&mut out, &mut tmp, width, height, radius, sigma)?;
    Ok(out)
}

/// In-place variant of [`blur_rgba8_premul`]; `tmp` is resized and reused as scratch.
pub fn blur_rgba8_premul_in_place(
    buf: &mut [u8],
    tmp: &mut Vec<u8>,
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> ClipstackResult<()> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ClipstackError::evaluation("blur buffer size overflow"))?;
    if buf.len() != expected_len {
        return Err(ClipstackError::evaluation(
            "blur expects a buffer matching width*height*4",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    tmp.clear();
    tmp.resize(expected_len, 0);

    horizontal_pass(buf, tmp, width, height, &kernel);
    vertical_pass(tmp, buf, width, height, &kernel);
    Ok(())
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ClipstackResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ClipstackError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(ClipstackError::evaluation("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = (((wf / sum) * 65536.0).round() as i64).clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Keep the kernel normalized after rounding.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
