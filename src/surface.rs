use std::path::Path;

use crate::util::Rgba;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("could not load texture image: {0}")]
    Load(#[from] image::ImageError),
    #[error("texture image has zero size")]
    Empty,
}

/// Narrow interface the shapes sample albedo through. The core never depends
/// on how the pixels were obtained.
pub trait Texture: Send + Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Sample with repeat wrapping; `u`/`v` may be any real number.
    fn albedo(&self, u: f32, v: f32) -> Rgba;
}

/// An image file decoded into linear f32 RGBA pixels.
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Surface {
    pub fn load(path: impl AsRef<Path>) -> Result<Surface, SurfaceError> {
        let image = image::open(path)?.into_rgba8();
        if image.width() == 0 || image.height() == 0 {
            return Err(SurfaceError::Empty);
        }

        let pixels = image
            .pixels()
            .map(|px| {
                Rgba::new(
                    px.0[0] as f32 / 255.0,
                    px.0[1] as f32 / 255.0,
                    px.0[2] as f32 / 255.0,
                    px.0[3] as f32 / 255.0,
                )
            })
            .collect();

        Ok(Surface {
            width: image.width(),
            height: image.height(),
            pixels,
        })
    }

    /// Build a surface from pre-existing pixels, row major. Mostly for tests.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Result<Surface, SurfaceError> {
        if width == 0 || height == 0 || pixels.len() != (width * height) as usize {
            return Err(SurfaceError::Empty);
        }
        Ok(Surface {
            width,
            height,
            pixels,
        })
    }
}

impl Texture for Surface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn albedo(&self, u: f32, v: f32) -> Rgba {
        // Repeat wrapping
        let u = u - u.floor();
        let v = v - v.floor();

        let x = (u * self.width as f32) as u32 % self.width;
        let y = (v * self.height as f32) as u32 % self.height;

        self.pixels[(y * self.width + x) as usize]
    }
}
