use crate::geometry::{FloatType, Ray, WorldPoint, WorldVector};
use crate::util::Rgba;

const ALBEDO: Rgba = Rgba {
    r: 0.1,
    g: 0.9,
    b: 0.1,
    a: 1.0,
};

pub struct Sphere {
    id: i32,
    center: WorldPoint,
    radius_squared: FloatType,
    inverse_radius: FloatType,
}

impl Sphere {
    pub fn new(id: i32, center: WorldPoint, radius: FloatType) -> Sphere {
        Sphere {
            id,
            center,
            radius_squared: radius * radius,
            inverse_radius: 1.0 / radius,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn set_position(&mut self, center: WorldPoint) {
        self.center = center;
    }

    pub fn intersect(&self, ray: &Ray) -> Option<FloatType> {
        let oc = ray.origin() - self.center;
        let b = oc.dot(ray.direction());
        let c = oc.dot(&oc) - self.radius_squared;
        let discriminant = b * b - c;
        if discriminant <= 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let near = -b - sqrt_disc;
        if near > 0.0 && near < ray.distance() {
            return Some(near);
        }
        if c > 0.0 {
            // Origin is outside and the near root is behind us
            return None;
        }

        let far = sqrt_disc - b;
        (far > 0.0 && far < ray.distance()).then_some(far)
    }

    /// Shadow query: only the near root matters, a light behind the far side
    /// of the sphere is blocked by the near side anyway.
    pub fn is_occluded(&self, ray: &Ray) -> bool {
        let oc = ray.origin() - self.center;
        let b = oc.dot(ray.direction());
        let c = oc.dot(&oc) - self.radius_squared;
        let discriminant = b * b - c;
        if discriminant <= 0.0 {
            return false;
        }

        let near = -b - discriminant.sqrt();
        near > 0.0 && near < ray.distance()
    }

    pub fn normal(&self, point: WorldPoint) -> WorldVector {
        (point - self.center) * self.inverse_radius
    }

    pub fn albedo(&self, _point: WorldPoint) -> Rgba {
        ALBEDO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;

    #[test]
    fn axial_hit_distance_and_normal() {
        let radius = 1.5;
        let sphere = Sphere::new(0, WorldPoint::origin(), radius);
        let ray = Ray::new(WorldPoint::new(0.0, 0.0, -2.0 * radius), WorldVector::z());

        let t = sphere.intersect(&ray).unwrap();
        assert!((t - radius).abs() < 1e-4);

        let normal = sphere.normal(ray.point_at(t));
        assert!((normal - WorldVector::new(0.0, 0.0, -1.0)).norm() < 1e-4);
    }

    #[test]
    fn inside_sphere_hits_far_side() {
        let sphere = Sphere::new(0, WorldPoint::origin(), 2.0);
        let ray = Ray::new(WorldPoint::origin(), WorldVector::x());

        let t = sphere.intersect(&ray).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn narrow_miss() {
        let sphere = Sphere::new(0, WorldPoint::origin(), 1.0);
        let ray = Ray::new(WorldPoint::new(1.01, 0.0, -5.0), WorldVector::z());
        assert!(sphere.intersect(&ray) == None);
    }

    #[test]
    fn occlusion_uses_near_root_only() {
        let sphere = Sphere::new(0, WorldPoint::origin(), 1.0);

        let outside = Ray::bounded(WorldPoint::new(0.0, 0.0, -3.0), WorldVector::z(), 10.0);
        assert!(sphere.is_occluded(&outside));

        // From inside only the far root is ahead of the origin
        let inside = Ray::bounded(WorldPoint::origin(), WorldVector::z(), 10.0);
        assert!(!sphere.is_occluded(&inside));
    }

    #[test]
    fn occlusion_respects_distance_bound() {
        let sphere = Sphere::new(0, WorldPoint::origin(), 1.0);
        let short = Ray::bounded(WorldPoint::new(0.0, 0.0, -3.0), WorldVector::z(), 1.5);
        assert!(!sphere.is_occluded(&short));
    }
}
