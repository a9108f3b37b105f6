mod cube;
mod plane;
mod quad;
mod sphere;
mod torus;

pub use cube::Cube;
pub use plane::Plane;
pub use quad::Quad;
pub use sphere::Sphere;
pub use torus::Torus;

use crate::geometry::{FloatType, Ray, WorldPoint, WorldTransform, WorldVector};
use crate::util::Rgba;

/// The closed set of renderable shapes.
///
/// Shape count is fixed and small, so a flat variant keeps the dispatch in the
/// intersection loop branch-predictable. Every shape answers the same four
/// questions: candidate hit distance, occlusion, outward normal and albedo.
pub enum Primitive {
    Plane(Plane),
    Sphere(Sphere),
    Cube(Cube),
    Quad(Quad),
    Torus(Torus),
}

impl Primitive {
    /// Stable id equal to the shape's index in its owning collection.
    pub fn id(&self) -> i32 {
        match self {
            Primitive::Plane(p) => p.id(),
            Primitive::Sphere(s) => s.id(),
            Primitive::Cube(c) => c.id(),
            Primitive::Quad(q) => q.id(),
            Primitive::Torus(t) => t.id(),
        }
    }

    /// Candidate hit distance in `(0, ray.distance())`, without touching the
    /// ray's hit record. The caller folds the minimum over all shapes and
    /// registers the winner.
    pub fn intersect(&self, ray: &Ray) -> Option<FloatType> {
        match self {
            Primitive::Plane(p) => p.intersect(ray),
            Primitive::Sphere(s) => s.intersect(ray),
            Primitive::Cube(c) => c.intersect(ray),
            Primitive::Quad(q) => q.intersect(ray),
            Primitive::Torus(t) => t.intersect(ray),
        }
    }

    /// Does the shape block the ray strictly before `ray.distance()`?
    pub fn is_occluded(&self, ray: &Ray) -> bool {
        match self {
            Primitive::Plane(p) => p.is_occluded(ray),
            Primitive::Sphere(s) => s.is_occluded(ray),
            Primitive::Cube(c) => c.is_occluded(ray),
            Primitive::Quad(q) => q.is_occluded(ray),
            Primitive::Torus(t) => t.is_occluded(ray),
        }
    }

    /// World-space outward normal, defined only near the surface.
    /// The torus normal is not unit length; normalize where needed.
    pub fn normal(&self, point: WorldPoint) -> WorldVector {
        match self {
            Primitive::Plane(p) => p.normal(point),
            Primitive::Sphere(s) => s.normal(point),
            Primitive::Cube(c) => c.normal(point),
            Primitive::Quad(q) => q.normal(point),
            Primitive::Torus(t) => t.normal(point),
        }
    }

    pub fn albedo(&self, point: WorldPoint) -> Rgba {
        match self {
            Primitive::Plane(p) => p.albedo(point),
            Primitive::Sphere(s) => s.albedo(point),
            Primitive::Cube(c) => c.albedo(point),
            Primitive::Quad(q) => q.albedo(point),
            Primitive::Torus(t) => t.albedo(point),
        }
    }
}

impl From<Plane> for Primitive {
    fn from(plane: Plane) -> Primitive {
        Primitive::Plane(plane)
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Primitive {
        Primitive::Sphere(sphere)
    }
}

impl From<Cube> for Primitive {
    fn from(cube: Cube) -> Primitive {
        Primitive::Cube(cube)
    }
}

impl From<Quad> for Primitive {
    fn from(quad: Quad) -> Primitive {
        Primitive::Quad(quad)
    }
}

impl From<Torus> for Primitive {
    fn from(torus: Torus) -> Primitive {
        Primitive::Torus(torus)
    }
}

/// Object-space mapping for transformed shapes. A non-invertible transform is
/// non-fatal: the shape keeps rendering with an identity mapping, possibly in
/// the wrong place.
pub(crate) fn invert_or_identity(transform: &WorldTransform) -> WorldTransform {
    transform.try_inverse().unwrap_or_else(|| {
        log::warn!("transform is not invertible, falling back to identity");
        WorldTransform::identity()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;

    #[test]
    fn degenerate_transform_falls_back_to_identity() {
        let inverse = invert_or_identity(&WorldTransform::zeros());
        assert!(inverse == WorldTransform::identity());
    }
}
