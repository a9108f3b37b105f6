mod worker;

use std::num::NonZeroUsize;
use std::thread;

use crate::camera::Camera;
use crate::framebuffer::{CHANNELS, Framebuffer};
use crate::geometry::ScreenSize;
use crate::renderer::worker::Worker;
use crate::scene::Scene;

#[derive(Copy, Clone, Debug)]
pub struct RenderSettings {
    /// Degree of parallelism, supplied by the caller. The renderer never
    /// reads ambient process state to size itself.
    pub thread_count: NonZeroUsize,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("framebuffer is {framebuffer:?} but the camera renders {camera:?}")]
    SizeMismatch {
        framebuffer: ScreenSize,
        camera: ScreenSize,
    },
    #[error("could not spawn render worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Renders one frame: one primary ray per pixel, nearest hit, albedo only.
///
/// Rows are split into one contiguous band per worker thread, so every worker
/// writes a disjoint region of the framebuffer. The scene and camera are
/// read-only for the whole pass; the pass is complete when all workers have
/// joined. There is no partial-frame abort path.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    framebuffer: &mut Framebuffer,
) -> Result<(), RenderError> {
    if framebuffer.size() != camera.resolution() {
        return Err(RenderError::SizeMismatch {
            framebuffer: framebuffer.size(),
            camera: camera.resolution(),
        });
    }

    let size = framebuffer.size();
    let row_stride = size.width as usize * CHANNELS;
    let band_rows = (size.height as usize).div_ceil(settings.thread_count.get());

    thread::scope(|scope| {
        for (band_index, band) in framebuffer
            .as_slice_mut()
            .chunks_mut(band_rows * row_stride)
            .enumerate()
        {
            let first_row = (band_index * band_rows) as u32;
            thread::Builder::new()
                .name(format!("render{band_index}"))
                .spawn_scoped(scope, move || {
                    Worker::new(size.width, first_row).render_band(scene, camera, band);
                })?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{WorldPoint, WorldTransform, WorldVector};
    use crate::scene::primitives::{Quad, Sphere};
    use crate::util::Rgba;
    use assert2::assert;
    use std::path::Path;

    fn settings(threads: usize) -> RenderSettings {
        RenderSettings {
            thread_count: NonZeroUsize::new(threads).unwrap(),
        }
    }

    #[test]
    fn empty_scene_renders_transparent_black() {
        let scene = Scene::new(vec![], vec![]);
        let camera = Camera::builder()
            .resolution(ScreenSize::new(16, 8))
            .build();
        let mut framebuffer = Framebuffer::new(ScreenSize::new(16, 8));

        render(&scene, &camera, &settings(2), &mut framebuffer).unwrap();

        assert!(framebuffer.as_slice().iter().all(|&value| value == 0.0));
    }

    #[test]
    fn sphere_shows_up_in_the_middle() {
        let scene = Scene::new(
            vec![Sphere::new(0, WorldPoint::new(0.0, 0.0, 2.0), 1.0).into()],
            vec![],
        );
        let camera = Camera::builder()
            .resolution(ScreenSize::new(32, 32))
            .build();
        let mut framebuffer = Framebuffer::new(ScreenSize::new(32, 32));

        render(&scene, &camera, &settings(3), &mut framebuffer).unwrap();

        // Sphere albedo in the center, nothing in the corner
        assert!(framebuffer.pixel(16, 16) == Rgba::new(0.1, 0.9, 0.1, 1.0));
        assert!(framebuffer.pixel(0, 0) == Rgba::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn light_pixels_use_light_albedo() {
        let scene = Scene::new(
            vec![],
            vec![Quad::new(
                0,
                4.0,
                WorldTransform::new_rotation(WorldVector::x() * std::f32::consts::FRAC_PI_2)
                    * WorldTransform::new_translation(&WorldVector::new(0.0, 2.0, 0.0)),
            )],
        );
        let camera = Camera::builder()
            .resolution(ScreenSize::new(8, 8))
            .build();
        let mut framebuffer = Framebuffer::new(ScreenSize::new(8, 8));

        render(&scene, &camera, &settings(1), &mut framebuffer).unwrap();

        assert!(framebuffer.pixel(4, 4) == Rgba::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn thread_count_does_not_change_the_image() {
        let mut scene = Scene::room(Path::new("assets/textures"));
        scene.set_time(0.7);
        let resolution = ScreenSize::new(40, 25);
        let camera = Camera::builder().resolution(resolution).build();

        let mut one = Framebuffer::new(resolution);
        let mut many = Framebuffer::new(resolution);
        render(&scene, &camera, &settings(1), &mut one).unwrap();
        render(&scene, &camera, &settings(7), &mut many).unwrap();

        assert!(one.as_slice() == many.as_slice());
    }

    #[test]
    fn more_threads_than_rows_is_fine() {
        let scene = Scene::new(vec![], vec![]);
        let resolution = ScreenSize::new(4, 2);
        let camera = Camera::builder().resolution(resolution).build();
        let mut framebuffer = Framebuffer::new(resolution);

        render(&scene, &camera, &settings(64), &mut framebuffer).unwrap();
    }

    #[test]
    fn size_mismatch_is_reported() {
        let scene = Scene::new(vec![], vec![]);
        let camera = Camera::builder()
            .resolution(ScreenSize::new(16, 8))
            .build();
        let mut framebuffer = Framebuffer::new(ScreenSize::new(8, 8));

        let result = render(&scene, &camera, &settings(1), &mut framebuffer);
        assert!(let Err(RenderError::SizeMismatch { .. }) = result);
    }
}
