use crate::camera::Camera;
use crate::framebuffer::CHANNELS;
use crate::geometry::Ray;
use crate::scene::Scene;
use crate::util::Rgba;

/// Renders one contiguous band of framebuffer rows.
pub struct Worker {
    width: u32,
    first_row: u32,
}

impl Worker {
    pub fn new(width: u32, first_row: u32) -> Self {
        Worker { width, first_row }
    }

    /// `band` is this worker's exclusive slice of the framebuffer, starting
    /// at `first_row` and holding whole rows.
    pub fn render_band(&self, scene: &Scene, camera: &Camera, band: &mut [f32]) {
        let row_stride = self.width as usize * CHANNELS;

        for (row_offset, row) in band.chunks_exact_mut(row_stride).enumerate() {
            let y = self.first_row + row_offset as u32;
            for (x, pixel) in row.chunks_exact_mut(CHANNELS).enumerate() {
                let mut ray = camera.primary_ray(x as u32, y);
                let color = trace(scene, &mut ray);

                pixel[0] = color.r;
                pixel[1] = color.g;
                pixel[2] = color.b;
                pixel[3] = color.a;
            }
        }
    }
}

/// Pure visibility plus albedo: no shading, no shadows, no blending.
fn trace(scene: &Scene, ray: &mut Ray) -> Rgba {
    scene.evaluate_ray(ray);

    match ray.last_hit() {
        None => Rgba::new(0.0, 0.0, 0.0, 0.0),
        Some((id, kind)) => scene.albedo(ray.intersection_point(), id, kind),
    }
}
