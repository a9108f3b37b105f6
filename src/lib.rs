mod camera;
mod framebuffer;
pub mod geometry;
mod renderer;
pub mod scene;
mod surface;
mod util;

pub use crate::renderer::{RenderError, RenderSettings, render};
pub use camera::{Camera, CameraInput};
pub use framebuffer::Framebuffer;
pub use scene::Scene;
pub use surface::{Surface, SurfaceError, Texture};
pub use util::Rgba;
