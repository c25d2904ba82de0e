use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{ClipstackError, ClipstackResult};

/// A CPU-rendered RGBA8 frame handed out of a [`Surface`].
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// A premultiplied RGBA8 drawing target.
pub struct Surface {
    pixmap: vello_cpu::Pixmap,
}

impl Surface {
    /// Allocate a cleared surface. Both dimensions must be in `1..=65535`.
    pub fn new(width: u32, height: u32) -> ClipstackResult<Self> {
        let (w, h) = surface_dims(width, height)?;
        Ok(Self {
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
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

    /// Mutable premultiplied bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.data_mut().fill(0);
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8Premul) {
        let rgba = color.to_array();
        for px in self.data_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
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

    /// Copy the pixels out.
    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.width(),
            height: self.height(),
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

pub(crate) fn surface_dims(width: u32, height: u32) -> ClipstackResult<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(ClipstackError::surface(format!(
            "surface must be non-empty, got {width}x{height}"
        )));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| ClipstackError::surface(format!("surface width exceeds u16: {width}")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ClipstackError::surface(format!("surface height exceeds u16: {height}")))?;
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
