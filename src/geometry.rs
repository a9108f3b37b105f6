use nalgebra::Unit;

pub type FloatType = f32;
pub type WorldPoint = nalgebra::Point3<FloatType>;
pub type WorldVector = nalgebra::Vector3<FloatType>;
pub type WorldTransform = nalgebra::Matrix4<FloatType>;

pub const EPSILON: FloatType = 1e-6;

/// Sentinel hit distance of a ray that has not hit anything yet.
pub const MAX_DISTANCE: FloatType = 1e34;

/// Sentinel hit id of a ray that has not hit anything yet.
pub const NO_HIT_ID: i32 = -1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> ScreenSize {
        ScreenSize { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn aspect_ratio(&self) -> FloatType {
        self.width as FloatType / self.height as FloatType
    }
}

/// Which of the scene's two collections the closest hit so far belongs to.
/// Object ids and light ids live in separate spaces, so a hit id alone is
/// ambiguous without this tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HitKind {
    Object,
    Light,
}

/// A ray together with its closest-hit record.
///
/// Created once per pixel per frame, evaluated against the scene exactly once
/// and discarded after color resolution.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    origin: WorldPoint,
    /// Normalized direction of the ray
    direction: Unit<WorldVector>,

    distance: FloatType,
    last_hit_id: i32,
    last_hit_kind: HitKind,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        Ray::bounded(origin, direction, MAX_DISTANCE)
    }

    /// A ray that only accepts hits closer than `limit`, for shadow and
    /// visibility queries toward a known point.
    pub fn bounded(origin: WorldPoint, direction: WorldVector, limit: FloatType) -> Ray {
        Ray {
            origin,
            direction: Unit::new_normalize(direction),
            distance: limit,
            last_hit_id: NO_HIT_ID,
            last_hit_kind: HitKind::Object,
        }
    }

    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    pub fn direction(&self) -> &WorldVector {
        &self.direction
    }

    pub fn distance(&self) -> FloatType {
        self.distance
    }

    pub fn last_hit_id(&self) -> i32 {
        self.last_hit_id
    }

    pub fn last_hit_kind(&self) -> HitKind {
        self.last_hit_kind
    }

    /// Overwrites the hit record unconditionally. The caller must have
    /// validated `0 < distance < self.distance()` beforehand; this never
    /// re-checks.
    pub fn register_hit(&mut self, id: i32, distance: FloatType) {
        self.distance = distance;
        self.last_hit_id = id;
    }

    pub fn register_hit_kind(&mut self, kind: HitKind) {
        self.last_hit_kind = kind;
    }

    /// The recorded hit, or None if the ray has not hit anything.
    pub fn last_hit(&self) -> Option<(usize, HitKind)> {
        if self.last_hit_id == NO_HIT_ID {
            None
        } else {
            Some((self.last_hit_id as usize, self.last_hit_kind))
        }
    }

    /// Point at the recorded hit distance. Only meaningful after a hit was
    /// registered.
    pub fn intersection_point(&self) -> WorldPoint {
        self.origin + self.distance * self.direction.as_ref()
    }

    pub fn point_at(&self, distance: FloatType) -> WorldPoint {
        self.origin + self.direction.as_ref() * distance
    }
}
