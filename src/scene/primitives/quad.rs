use super::invert_or_identity;
use crate::geometry::{FloatType, Ray, WorldPoint, WorldTransform, WorldVector};
use crate::util::Rgba;

const ALBEDO: Rgba = Rgba {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

/// Square in the object-space `y = 0` plane, placed by a transform.
///
/// The intersection only reads the three inverse-transform rows needed for
/// the local Y, X and Z coordinates (translation in the fourth column), so
/// shearing transforms are not supported. This is a standing constraint, not
/// an oversight.
pub struct Quad {
    id: i32,
    half_size: FloatType,
    transform: WorldTransform,
    inverse: WorldTransform,
}

impl Quad {
    pub fn new(id: i32, size: FloatType, transform: WorldTransform) -> Quad {
        Quad {
            id,
            half_size: size * 0.5,
            transform,
            inverse: invert_or_identity(&transform),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn half_size(&self) -> FloatType {
        self.half_size
    }

    pub fn transform(&self) -> &WorldTransform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: WorldTransform) {
        self.transform = transform;
        self.inverse = invert_or_identity(&transform);
    }

    fn local_hit(&self, ray: &Ray) -> Option<FloatType> {
        let it = &self.inverse;
        let o = ray.origin();
        let d = ray.direction();

        // Local Y of origin and direction, solving the y = 0 plane first
        let oy = it[(1, 0)] * o.x + it[(1, 1)] * o.y + it[(1, 2)] * o.z + it[(1, 3)];
        let dy = it[(1, 0)] * d.x + it[(1, 1)] * d.y + it[(1, 2)] * d.z;
        let t = oy / -dy;

        if t > 0.0 && t < ray.distance() {
            let ox = it[(0, 0)] * o.x + it[(0, 1)] * o.y + it[(0, 2)] * o.z + it[(0, 3)];
            let oz = it[(2, 0)] * o.x + it[(2, 1)] * o.y + it[(2, 2)] * o.z + it[(2, 3)];
            let dx = it[(0, 0)] * d.x + it[(0, 1)] * d.y + it[(0, 2)] * d.z;
            let dz = it[(2, 0)] * d.x + it[(2, 1)] * d.y + it[(2, 2)] * d.z;
            let ix = ox + t * dx;
            let iz = oz + t * dz;

            if ix > -self.half_size
                && ix < self.half_size
                && iz > -self.half_size
                && iz < self.half_size
            {
                return Some(t);
            }
        }

        None
    }

    pub fn intersect(&self, ray: &Ray) -> Option<FloatType> {
        self.local_hit(ray)
    }

    pub fn is_occluded(&self, ray: &Ray) -> bool {
        self.local_hit(ray).is_some()
    }

    /// Constant normal: the object-space Y axis column of the transform,
    /// negated so it faces the room below the light.
    pub fn normal(&self, _point: WorldPoint) -> WorldVector {
        let t = &self.transform;
        WorldVector::new(-t[(0, 1)], -t[(1, 1)], -t[(2, 1)])
    }

    pub fn albedo(&self, _point: WorldPoint) -> Rgba {
        ALBEDO
    }
}
