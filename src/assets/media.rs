use std::fmt;
use std::sync::Arc;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{ClipstackError, ClipstackResult};
use crate::foundation::math::premul_rgba8;

/// Displayable handle of a media asset: yields the frame shown at a source time.
///
/// Decoding lives outside the core; implementations hand over already-decoded pixels.
/// Closures `Fn(f64) -> ClipstackResult<Option<MediaFrame>>` implement this trait.
pub trait MediaSource: Send + Sync {
    /// Frame at `source_time` seconds into the source, or `None` when nothing is ready yet.
    fn frame_at(&self, source_time: f64) -> ClipstackResult<Option<MediaFrame>>;
}

impl<F> MediaSource for F
where
    F: Fn(f64) -> ClipstackResult<Option<MediaFrame>> + Send + Sync,
{
    fn frame_at(&self, source_time: f64) -> ClipstackResult<Option<MediaFrame>> {
        self(source_time)
    }
}

/// An immutable premultiplied RGBA8 frame, cheap to clone.
#[derive(Clone)]
pub struct MediaFrame {
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl MediaFrame {
    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(bytes: &[u8], width: u32, height: u32) -> ClipstackResult<Self> {
        let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
        Ok(Self {
            pixmap: Arc::new(pixmap),
        })
    }

    /// Premultiply and wrap straight-alpha RGBA8 bytes.
    pub fn from_straight_rgba8(bytes: &[u8], width: u32, height: u32) -> ClipstackResult<Self> {
        let premul: Vec<u8> = bytes
            .chunks_exact(4)
            .flat_map(|px| premul_rgba8([px[0], px[1], px[2], px[3]]))
            .collect();
        if premul.len() != bytes.len() {
            return Err(ClipstackError::media("rgba8 byte length must be a multiple of 4"));
        }
        Self::from_premul_rgba8(&premul, width, height)
    }

    /// Convert an already-decoded `image` buffer.
    pub fn from_rgba_image(img: &image::RgbaImage) -> ClipstackResult<Self> {
        Self::from_straight_rgba8(img.as_raw(), img.width(), img.height())
    }

    /// A frame filled with one color.
    pub fn solid(color: Rgba8Premul, width: u32, height: u32) -> ClipstackResult<Self> {
        let px = (width as usize).saturating_mul(height as usize);
        Self::from_premul_rgba8(&color.to_array().repeat(px), width, height)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.pixmap.width())
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.pixmap.height())
    }

    /// Premultiplied bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let i = ((y as usize) * (self.width() as usize) + (x as usize)) * 4;
        let d = self.data();
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    /// Recolor every pixel to `straight_rgba`, keeping the frame's alpha as a mask.
    pub fn tinted(&self, straight_rgba: [u8; 4]) -> ClipstackResult<Self> {
        let [r, g, b, a] = straight_rgba;
        let out: Vec<u8> = self
            .data()
            .chunks_exact(4)
            .flat_map(|px| {
                let alpha = crate::foundation::math::mul_div255_u8(u16::from(px[3]), u16::from(a));
                premul_rgba8([r, g, b, alpha])
            })
            .collect();
        Self::from_premul_rgba8(&out, self.width(), self.height())
    }

    pub(crate) fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

impl fmt::Debug for MediaFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaFrame")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// A source that shows the same frame at every time (images, posters, tests).
#[derive(Clone, Debug)]
pub struct StillImage {
    frame: MediaFrame,
}

impl StillImage {
    /// Wrap a frame.
    pub fn new(frame: MediaFrame) -> Self {
        Self { frame }
    }

    /// Shared handle ready for [`MediaAsset::with_source`](crate::MediaAsset::with_source).
    pub fn shared(frame: MediaFrame) -> Arc<dyn MediaSource> {
        Arc::new(Self::new(frame))
    }
}

impl MediaSource for StillImage {
    fn frame_at(&self, _source_time: f64) -> ClipstackResult<Option<MediaFrame>> {
        Ok(Some(self.frame.clone()))
    }
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ClipstackResult<vello_cpu::Pixmap> {
    if width == 0 || height == 0 {
        return Err(ClipstackError::media(format!(
            "media frame must be non-empty, got {width}x{height}"
        )));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| ClipstackError::media("media frame width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ClipstackError::media("media frame height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ClipstackError::media("media frame byte len mismatch"));
    }
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(bytes.len() / 4);
    for px in bytes.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
