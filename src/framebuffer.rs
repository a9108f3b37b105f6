use crate::geometry::ScreenSize;
use crate::util::{Rgba, color_to_image};

/// Flat row-major RGBA f32 pixel storage, allocated once by the caller and
/// reused across frames. Pixel `(x, y)` lives at float offset
/// `(y * width + x) * 4`.
pub struct Framebuffer {
    size: ScreenSize,
    data: Vec<f32>,
}

/// Floats per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

impl Framebuffer {
    pub fn new(size: ScreenSize) -> Framebuffer {
        Framebuffer {
            size,
            data: vec![0.0; size.pixel_count() * CHANNELS],
        }
    }

    pub fn size(&self) -> ScreenSize {
        self.size
    }

    /// Floats in one row.
    pub fn row_stride(&self) -> usize {
        self.size.width as usize * CHANNELS
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let offset = (y as usize * self.size.width as usize + x as usize) * CHANNELS;
        let px = &self.data[offset..offset + CHANNELS];
        Rgba::new(px[0], px[1], px[2], px[3])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_slice_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Raw little-endian byte view of the pixel floats, for frame consumers
    /// that take untyped buffers.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Clamp-and-scale conversion for saving with the image crate.
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.size.width, self.size.height, |x, y| {
            color_to_image(self.pixel(x, y))
        })
    }
}
