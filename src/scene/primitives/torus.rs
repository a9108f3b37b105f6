use nalgebra::Vector3;

use super::invert_or_identity;
use crate::geometry::{FloatType, Ray, WorldPoint, WorldTransform, WorldVector};
use crate::util::Rgba;

const ALBEDO: Rgba = Rgba {
    r: 0.1,
    g: 0.1,
    b: 0.9,
    a: 1.0,
};

const ONE_THIRD: f64 = 0.33333333333;
const TRIG_ONE_THIRD: f64 = 0.333333333;

/// When the derived cubic coefficient gets this close to zero the direct
/// solve divides by almost-nothing; the solver then swaps to the reciprocal
/// parametrization (`t -> 2/t`).
const STABILITY_THRESHOLD: f64 = 1e-4;

/// Placeholder distance meaning "no positive root found yet".
const NO_ROOT: f64 = 1e20;

/// Torus around the object-space Z axis, placed by a transform.
///
/// The quartic in `t` is reduced to a depressed cubic and solved closed-form.
/// All coefficient algebra runs in f64: the expansion cancels catastrophically
/// in single precision. Only the accepted root is narrowed back to f32.
pub struct Torus {
    id: i32,
    /// Ring radius squared
    ring_radius2: f64,
    /// Tube radius squared
    tube_radius2: f64,
    /// Bounding sphere rejection term, `sqrt(ring + tube)`
    bounding_term: f64,
    transform: WorldTransform,
    inverse: WorldTransform,
}

/// Output of the shared cubic reduction, enough to recover the two quadratic
/// sub-problems.
struct ReducedCubic {
    /// -1 when the stability swap was taken, +1 otherwise
    po: f64,
    k3: f64,
    z: f64,
    d1: f64,
    d2: f64,
}

impl Torus {
    pub fn new(
        id: i32,
        ring_radius: FloatType,
        tube_radius: FloatType,
        transform: WorldTransform,
    ) -> Torus {
        Torus {
            id,
            ring_radius2: (ring_radius * ring_radius) as f64,
            tube_radius2: (tube_radius * tube_radius) as f64,
            bounding_term: ((ring_radius + tube_radius) as f64).sqrt(),
            transform,
            inverse: invert_or_identity(&transform),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn set_transform(&mut self, transform: WorldTransform) {
        self.transform = transform;
        self.inverse = invert_or_identity(&transform);
    }

    /// Shared front half of the solver: object-space quartic coefficients,
    /// stability swap and reduction to a solved depressed cubic.
    fn reduce(&self, ray: &Ray) -> Option<ReducedCubic> {
        let o = self.inverse.transform_point(&ray.origin());
        let d = self.inverse.transform_vector(ray.direction());
        let o = Vector3::new(o.x as f64, o.y as f64, o.z as f64);
        let d = Vector3::new(d.x as f64, d.y as f64, d.z as f64);

        let rc2 = self.ring_radius2;
        let rt2 = self.tube_radius2;

        let mut po = 1.0;
        let m = o.dot(&o);
        let mut k3 = o.dot(&d);
        let mut k32 = k3 * k3;

        // Bounding sphere rejection
        if k32 - m + self.bounding_term < 0.0 {
            return None;
        }

        let k = (m - rt2 - rc2) * 0.5;
        let mut k2 = k32 + rc2 * d.z * d.z + k;
        let mut k1 = k * k3 + rc2 * o.z * d.z;
        let mut k0 = k * k + rc2 * o.z * o.z - rc2 * rt2;

        if (k3 * (k32 - k2) + k1).abs() < STABILITY_THRESHOLD {
            std::mem::swap(&mut k3, &mut k1);
            po = -1.0;
            k0 = 1.0 / k0;
            k1 *= k0;
            k2 *= k0;
            k3 *= k0;
            k32 = k3 * k3;
        }

        let mut c2 = 2.0 * k2 - 3.0 * k32;
        let mut c1 = k3 * (k32 - k2) + k1;
        let mut c0 = k3 * (k3 * (-3.0 * k32 + 4.0 * k2) - 8.0 * k1) + 4.0 * k0;
        c2 *= ONE_THIRD;
        c1 *= 2.0;
        c0 *= ONE_THIRD;

        let q = c2 * c2 + c0;
        let r = 3.0 * c0 * c2 - c2 * c2 * c2 - c1 * c1;
        let h = r * r - q * q * q;

        let z = if h < 0.0 {
            // Three real roots, trigonometric branch
            let sq = q.sqrt();
            2.0 * sq * ((r / (sq * q)).acos() * TRIG_ONE_THIRD).cos()
        } else {
            let sq = cbrt_fast(h.sqrt() + r.abs());
            let sign = if r == 0.0 { 0.0 } else { r.signum() };
            sign * (sq + q / sq).abs()
        };
        let z = c2 - z;

        let mut d1 = z - 3.0 * c2;
        let mut d2 = z * z - 3.0 * c0;
        if d1.abs() < 1e-8 {
            if d2 < 0.0 {
                return None;
            }
            d2 = d2.sqrt();
        } else {
            if d1 < 0.0 {
                return None;
            }
            d1 = (d1 * 0.5).sqrt();
            d2 = c1 / d1;
        }

        Some(ReducedCubic { po, k3, z, d1, d2 })
    }

    pub fn intersect(&self, ray: &Ray) -> Option<FloatType> {
        let ReducedCubic { po, k3, z, d1, d2 } = self.reduce(ray)?;

        let mut t = NO_ROOT;

        let h = d1 * d1 - z + d2;
        if h > 0.0 {
            let h = h.sqrt();
            let mut t1 = -d1 - h - k3;
            let mut t2 = -d1 + h - k3;
            if po < 0.0 {
                t1 = 2.0 / t1;
                t2 = 2.0 / t2;
            }
            if t1 > 0.0 {
                t = t1;
            }
            if t2 > 0.0 {
                t = t.min(t2);
            }
        }

        let h = d1 * d1 - z - d2;
        if h > 0.0 {
            let h = h.sqrt();
            let mut t1 = d1 - h - k3;
            let mut t2 = d1 + h - k3;
            if po < 0.0 {
                t1 = 2.0 / t1;
                t2 = 2.0 / t2;
            }
            if t1 > 0.0 {
                t = t.min(t1);
            }
            if t2 > 0.0 {
                t = t.min(t2);
            }
        }

        if t == NO_ROOT {
            return None;
        }

        // Narrow to f32 only at the accepted root
        let t = t as FloatType;
        (t > 0.0 && t < ray.distance()).then_some(t)
    }

    /// Shadow variant: takes the first in-range smaller root of either
    /// quadratic instead of minimizing over all four candidates.
    pub fn is_occluded(&self, ray: &Ray) -> bool {
        let Some(ReducedCubic { po, k3, z, d1, d2 }) = self.reduce(ray) else {
            return false;
        };

        let h = d1 * d1 - z + d2;
        if h > 0.0 {
            let mut t1 = -d1 - h.sqrt() - k3;
            if po < 0.0 {
                t1 = 2.0 / t1;
            }
            if t1 > 0.0 && (t1 as FloatType) < ray.distance() {
                return true;
            }
        }

        let h = d1 * d1 - z - d2;
        if h > 0.0 {
            let mut t1 = d1 - h.sqrt() - k3;
            if po < 0.0 {
                t1 = 2.0 / t1;
            }
            if t1 > 0.0 && (t1 as FloatType) < ray.distance() {
                return true;
            }
        }

        false
    }

    /// Gradient-like expression of the implicit surface in object space,
    /// mapped to world space. Not unit length.
    pub fn normal(&self, point: WorldPoint) -> WorldVector {
        let l = self.inverse.transform_point(&point).coords;
        let m = l.dot(&l);

        let rc2 = self.ring_radius2 as FloatType;
        let rt2 = self.tube_radius2 as FloatType;
        let scale = WorldVector::new(m - rt2 - rc2, m - rt2 - rc2, m - rt2 + rc2);

        self.transform.transform_vector(&l.component_mul(&scale))
    }

    pub fn albedo(&self, _point: WorldPoint) -> Rgba {
        ALBEDO
    }
}

/// Real cube root via a fixed-point Newton iteration. Deliberately not the
/// library `cbrt`: the solver's numeric behavior is tuned around this
/// approximation.
fn cbrt_fast(n: f64) -> f64 {
    let mut x1 = n / 10.0;
    let mut x2 = 1.0;
    let mut turn = 0;
    while (x1 - x2).abs() > 1e-8 && turn < 100 {
        turn += 1;
        x1 = x2;
        x2 = 2.0 / 3.0 * x1 + n / (3.0 * x1 * x1);
    }
    x2
}
