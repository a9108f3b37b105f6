use itertools::Itertools as _;
use ordered_float::OrderedFloat;

use super::invert_or_identity;
use crate::geometry::{FloatType, Ray, WorldPoint, WorldTransform, WorldVector};
use crate::util::Rgba;

const ALBEDO: Rgba = Rgba {
    r: 0.9,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

/// Axis-aligned box in object space, placed in the world by a transform.
pub struct Cube {
    id: i32,
    /// Opposite corners, `corners[0]` componentwise below `corners[1]`.
    corners: [WorldPoint; 2],
    transform: WorldTransform,
    inverse: WorldTransform,
}

impl Cube {
    pub fn new(id: i32, position: WorldPoint, size: WorldVector) -> Cube {
        Cube {
            id,
            corners: [position - 0.5 * size, position + 0.5 * size],
            transform: WorldTransform::identity(),
            inverse: WorldTransform::identity(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn set_transform(&mut self, transform: WorldTransform) {
        self.transform = transform;
        self.inverse = invert_or_identity(&transform);
    }

    /// Slab test in object space. Axis-parallel direction components divide to
    /// IEEE infinities, which drop the axis out of the interval intersection
    /// on their own.
    pub fn intersect(&self, ray: &Ray) -> Option<FloatType> {
        let origin = self.inverse.transform_point(&ray.origin());
        let direction = self.inverse.transform_vector(ray.direction());

        let inv_dx = 1.0 / direction.x;
        let inv_dy = 1.0 / direction.y;
        let inv_dz = 1.0 / direction.z;
        let sign_x = (direction.x < 0.0) as usize;
        let sign_y = (direction.y < 0.0) as usize;
        let sign_z = (direction.z < 0.0) as usize;

        let mut t_min = (self.corners[sign_x].x - origin.x) * inv_dx;
        let mut t_max = (self.corners[1 - sign_x].x - origin.x) * inv_dx;

        let ty_min = (self.corners[sign_y].y - origin.y) * inv_dy;
        let ty_max = (self.corners[1 - sign_y].y - origin.y) * inv_dy;
        if t_min > ty_max || ty_min > t_max {
            return None;
        }
        t_min = t_min.max(ty_min);
        t_max = t_max.min(ty_max);

        let tz_min = (self.corners[sign_z].z - origin.z) * inv_dz;
        let tz_max = (self.corners[1 - sign_z].z - origin.z) * inv_dz;
        if t_min > tz_max || tz_min > t_max {
            return None;
        }
        t_min = t_min.max(tz_min);
        t_max = t_max.min(tz_max);

        if t_min > 0.0 {
            (t_min < ray.distance()).then_some(t_min)
        } else if t_max > 0.0 {
            // Ray origin is inside the box
            (t_max < ray.distance()).then_some(t_max)
        } else {
            None
        }
    }

    pub fn is_occluded(&self, ray: &Ray) -> bool {
        let origin = self.inverse.transform_point(&ray.origin());
        let direction = self.inverse.transform_vector(ray.direction());

        let inv_dx = 1.0 / direction.x;
        let inv_dy = 1.0 / direction.y;
        let inv_dz = 1.0 / direction.z;
        let t1 = (self.corners[0].x - origin.x) * inv_dx;
        let t2 = (self.corners[1].x - origin.x) * inv_dx;
        let t3 = (self.corners[0].y - origin.y) * inv_dy;
        let t4 = (self.corners[1].y - origin.y) * inv_dy;
        let t5 = (self.corners[0].z - origin.z) * inv_dz;
        let t6 = (self.corners[1].z - origin.z) * inv_dz;

        let t_min = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let t_max = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        t_max > 0.0 && t_min < t_max && t_min < ray.distance()
    }

    /// Nearest of the six corner planes in object space decides the face.
    pub fn normal(&self, point: WorldPoint) -> WorldVector {
        let p = self.inverse.transform_point(&point);

        let face_distances = [
            (p.x - self.corners[0].x).abs(),
            (p.x - self.corners[1].x).abs(),
            (p.y - self.corners[0].y).abs(),
            (p.y - self.corners[1].y).abs(),
            (p.z - self.corners[0].z).abs(),
            (p.z - self.corners[1].z).abs(),
        ];
        let face_normals = [
            -WorldVector::x(),
            WorldVector::x(),
            -WorldVector::y(),
            WorldVector::y(),
            -WorldVector::z(),
            WorldVector::z(),
        ];

        let face = face_distances
            .iter()
            .position_min_by_key(|d| OrderedFloat(**d))
            .unwrap_or(0);
        self.transform.transform_vector(&face_normals[face])
    }

    pub fn albedo(&self, _point: WorldPoint) -> Rgba {
        ALBEDO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;
    use test_case::test_case;

    fn unit_cube() -> Cube {
        Cube::new(0, WorldPoint::origin(), WorldVector::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn axial_hit_distance_and_normal() {
        let cube = unit_cube();
        let ray = Ray::new(WorldPoint::new(0.0, 0.0, -5.0), WorldVector::z());

        let t = cube.intersect(&ray).unwrap();
        assert!((t - 4.5).abs() < 1e-5);

        let normal = cube.normal(ray.point_at(t));
        assert!((normal - WorldVector::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn inside_hits_far_face() {
        let cube = unit_cube();
        let ray = Ray::new(WorldPoint::origin(), WorldVector::z());

        let t = cube.intersect(&ray).unwrap();
        assert!((t - 0.5).abs() < 1e-5);
    }

    // Rays parallel to an axis and outside the corresponding slab must miss;
    // the zero-division infinities must not trap or produce hits.
    #[test_case( 2.0,  0.0,  0.0,   0.0, 0.0, 1.0 ; "outside_x_slab")]
    #[test_case(-2.0,  0.0,  0.0,   0.0, 1.0, 0.0 ; "outside_x_slab_other_axis")]
    #[test_case( 0.0,  2.0,  0.0,   1.0, 0.0, 0.0 ; "outside_y_slab")]
    #[test_case( 0.0,  0.0, -2.0,   1.0, 0.0, 0.0 ; "outside_z_slab")]
    #[test_case( 0.0,  0.0, -2.0,   0.0, 1.0, 0.0 ; "outside_z_slab_vertical")]
    fn parallel_misses(px: f32, py: f32, pz: f32, dx: f32, dy: f32, dz: f32) {
        let cube = unit_cube();
        let ray = Ray::new(WorldPoint::new(px, py, pz), WorldVector::new(dx, dy, dz));
        assert!(cube.intersect(&ray) == None);
        assert!(!cube.is_occluded(&ray));
    }

    #[test]
    fn transformed_cube_moves_with_its_transform() {
        let mut cube = unit_cube();
        cube.set_transform(WorldTransform::new_translation(&WorldVector::new(
            3.0, 0.0, 0.0,
        )));

        let miss = Ray::new(WorldPoint::new(0.0, 0.0, -5.0), WorldVector::z());
        assert!(cube.intersect(&miss) == None);

        let hit = Ray::new(WorldPoint::new(3.0, 0.0, -5.0), WorldVector::z());
        let t = hit.point_at(cube.intersect(&hit).unwrap());
        assert!((t - WorldPoint::new(3.0, 0.0, -0.5)).norm() < 1e-5);
    }

    #[test]
    fn rotated_cube_normal_is_rotated() {
        let mut cube = unit_cube();
        // Quarter turn around Y: the -Z face now looks along -X
        let quarter = WorldTransform::new_rotation(WorldVector::y() * std::f32::consts::FRAC_PI_2);
        cube.set_transform(quarter);

        let ray = Ray::new(WorldPoint::new(-5.0, 0.0, 0.0), WorldVector::x());
        let t = cube.intersect(&ray).unwrap();
        let normal = cube.normal(ray.point_at(t));
        assert!((normal - WorldVector::new(-1.0, 0.0, 0.0)).norm() < 1e-4);
    }

    #[test]
    fn occlusion_respects_distance_bound() {
        let cube = unit_cube();
        let blocked = Ray::bounded(WorldPoint::new(0.0, 0.0, -5.0), WorldVector::z(), 10.0);
        assert!(cube.is_occluded(&blocked));

        let short = Ray::bounded(WorldPoint::new(0.0, 0.0, -5.0), WorldVector::z(), 2.0);
        assert!(!cube.is_occluded(&short));
    }

    #[test]
    fn degenerate_transform_keeps_object_space_mapping() {
        let mut cube = unit_cube();
        cube.set_transform(WorldTransform::zeros());

        // The inverse falls back to identity, so the slab test still sees the
        // untransformed box.
        let ray = Ray::new(WorldPoint::new(0.0, 0.0, -5.0), WorldVector::z());
        assert!(let Some(_) = cube.intersect(&ray));
    }
}
