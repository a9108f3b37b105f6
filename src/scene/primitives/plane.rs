use std::sync::Arc;

use crate::geometry::{FloatType, Ray, WorldPoint, WorldVector};
use crate::surface::Texture;
use crate::util::Rgba;

/// Checkerboard spatial frequency and offset over the `(x, z)` coordinates.
const CHECKER_FREQUENCY: FloatType = 2.0;
const CHECKER_OFFSET: FloatType = 96.01;
const CHECKER_BRIGHT: FloatType = 1.0;
const CHECKER_DARK: FloatType = 0.3;

/// Two specific tiles get resampled at a higher spatial frequency, which makes
/// them alias on purpose. These are scene constants of the original teaching
/// room, not a general de-aliasing rule.
const ALIAS_TILE_A: (i32, i32) = (98, 98);
const ALIAS_FREQUENCY_A: FloatType = 32.01;
const ALIAS_TILE_B: (i32, i32) = (94, 98);
const ALIAS_FREQUENCY_B: FloatType = 64.01;

/// A plane is infinite, so a texture is tiled over it with this fixed scale.
const TEXTURE_MAPPING_SCALE: FloatType = 480.0;

/// Normals closer to `±X` than this are treated as left/right facing walls
/// when orienting texture coordinates.
const AXIS_FACING_THRESHOLD: FloatType = 0.99;

/// Infinite plane `dot(p, normal) + distance = 0`, optionally textured.
pub struct Plane {
    id: i32,
    normal: WorldVector,
    distance: FloatType,
    texture: Option<Arc<dyn Texture>>,
}

impl Plane {
    pub fn new(id: i32, normal: WorldVector, distance: FloatType) -> Plane {
        Plane {
            id,
            normal,
            distance,
            texture: None,
        }
    }

    pub fn textured(
        id: i32,
        normal: WorldVector,
        distance: FloatType,
        texture: Arc<dyn Texture>,
    ) -> Plane {
        Plane {
            id,
            normal,
            distance,
            texture: Some(texture),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn intersect(&self, ray: &Ray) -> Option<FloatType> {
        let t = -(ray.origin().coords.dot(&self.normal) + self.distance)
            / ray.direction().dot(&self.normal);
        (t > 0.0 && t < ray.distance()).then_some(t)
    }

    /// Planes are the room's walls; they never sit between a sample point and
    /// a light, so they do not participate in shadow queries.
    pub fn is_occluded(&self, _ray: &Ray) -> bool {
        false
    }

    pub fn normal(&self, _point: WorldPoint) -> WorldVector {
        self.normal
    }

    pub fn albedo(&self, point: WorldPoint) -> Rgba {
        match &self.texture {
            None => self.checkerboard(point),
            Some(texture) => self.textured_albedo(texture.as_ref(), point),
        }
    }

    fn checkerboard(&self, point: WorldPoint) -> Rgba {
        let mut ix = (point.x * CHECKER_FREQUENCY + CHECKER_OFFSET) as i32;
        let mut iz = (point.z * CHECKER_FREQUENCY + CHECKER_OFFSET) as i32;

        if (ix, iz) == ALIAS_TILE_A {
            ix = (point.x * ALIAS_FREQUENCY_A) as i32;
            iz = (point.z * ALIAS_FREQUENCY_A) as i32;
        }
        if (ix, iz) == ALIAS_TILE_B {
            ix = (point.x * ALIAS_FREQUENCY_B) as i32;
            iz = (point.z * ALIAS_FREQUENCY_B) as i32;
        }

        let c = if (ix + iz) & 1 == 1 {
            CHECKER_BRIGHT
        } else {
            CHECKER_DARK
        };
        Rgba::new(c, c, c, 1.0)
    }

    fn textured_albedo(&self, texture: &dyn Texture, point: WorldPoint) -> Rgba {
        // Seed vector: the world axis along the normal's smallest component,
        // guaranteed not to be parallel to the normal.
        let abs = self.normal.abs();
        let seed = if abs.x < abs.y && abs.x < abs.z {
            WorldVector::x()
        } else if abs.y < abs.z {
            WorldVector::y()
        } else {
            WorldVector::z()
        };

        let tangent = seed.cross(&self.normal).normalize();
        let bitangent = self.normal.cross(&tangent).normalize();

        // Left and right facing walls need their texture axes rotated so the
        // image is not sideways or mirrored.
        let (tangent, bitangent) = if self.normal.x < -AXIS_FACING_THRESHOLD {
            (bitangent, -tangent)
        } else if self.normal.x > AXIS_FACING_THRESHOLD {
            (-bitangent, tangent)
        } else {
            (tangent, bitangent)
        };

        let u = 1.0
            - point.coords.dot(&tangent) / texture.width() as FloatType * TEXTURE_MAPPING_SCALE;
        let v = 1.0
            - point.coords.dot(&bitangent) / texture.height() as FloatType * TEXTURE_MAPPING_SCALE;
        texture.albedo(u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MAX_DISTANCE;
    use crate::surface::Surface;
    use assert2::assert;

    fn floor() -> Plane {
        // y = -1 plane facing up
        Plane::new(0, WorldVector::y(), 1.0)
    }

    #[test]
    fn hits_from_above() {
        let ray = Ray::new(WorldPoint::origin(), -WorldVector::y());
        let t = floor().intersect(&ray);
        assert!(let Some(_) = t);
        assert!((t.unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn misses_when_facing_away() {
        let ray = Ray::new(WorldPoint::origin(), WorldVector::y());
        assert!(floor().intersect(&ray) == None);
    }

    #[test]
    fn respects_ray_distance_bound() {
        let ray = Ray::bounded(WorldPoint::origin(), -WorldVector::y(), 0.5);
        assert!(floor().intersect(&ray) == None);
    }

    #[test]
    fn parallel_ray_misses_without_trapping() {
        // Direction orthogonal to the normal divides by zero; the infinity
        // must flow through the comparison as a miss.
        let ray = Ray::new(WorldPoint::new(0.0, 5.0, 0.0), WorldVector::x());
        assert!(floor().intersect(&ray) == None);
    }

    #[test]
    fn never_occludes() {
        let ray = Ray::bounded(WorldPoint::origin(), -WorldVector::y(), MAX_DISTANCE);
        assert!(!floor().is_occluded(&ray));
    }

    #[test]
    fn checkerboard_alternates() {
        let plane = floor();
        let a = plane.albedo(WorldPoint::new(0.1, -1.0, 0.1));
        let b = plane.albedo(WorldPoint::new(0.6, -1.0, 0.1));
        assert!(a.r != b.r);
        assert!(a.r == a.g && a.g == a.b);
        assert!(a.a == 1.0);
    }

    #[test]
    fn alias_tiles_use_higher_frequency() {
        let plane = floor();
        // Both points land in tile (98, 98), which resamples at 32x
        // frequency: inside that tile the pattern must vary.
        let a = plane.albedo(WorldPoint::new(1.05, -1.0, 1.05));
        let b = plane.albedo(WorldPoint::new(1.07, -1.0, 1.05));
        assert!(a.r != b.r);
    }

    #[test]
    fn textured_plane_samples_texture() {
        let texture = Arc::new(
            Surface::from_pixels(1, 1, vec![Rgba::new(0.25, 0.5, 0.75, 1.0)]).unwrap(),
        );
        let plane = Plane::textured(1, WorldVector::x(), 3.0, texture);
        let albedo = plane.albedo(WorldPoint::new(-3.0, 0.4, 0.2));
        assert!(albedo == Rgba::new(0.25, 0.5, 0.75, 1.0));
    }
}
