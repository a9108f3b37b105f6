use bon::bon;

use crate::geometry::{FloatType, Ray, ScreenSize, WorldPoint, WorldVector};

/// Movement speed in world units per second.
const SPEED: FloatType = 1.25;

/// Distance from the eye to the view plane.
const VIEW_PLANE_DISTANCE: FloatType = 2.0;

/// Per-frame snapshot of the named direction keys the host polled.
/// The core never talks to a keyboard directly.
#[derive(Copy, Clone, Debug, Default)]
pub struct CameraInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub look_up: bool,
    pub look_down: bool,
    pub look_left: bool,
    pub look_right: bool,
    /// Modifier that doubles the movement speed.
    pub boost: bool,
}

impl CameraInput {
    fn any_held(&self) -> bool {
        self.forward
            || self.backward
            || self.left
            || self.right
            || self.look_up
            || self.look_down
            || self.look_left
            || self.look_right
    }
}

/// Pinhole camera described by an eye position and a view-plane rectangle.
///
/// The three stored corners are always consistent with the last known
/// ahead/right/up basis; they are only ever recomputed together.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    position: WorldPoint,
    target: WorldPoint,
    resolution: ScreenSize,

    top_left: WorldPoint,
    top_right: WorldPoint,
    bottom_left: WorldPoint,
}

#[bon]
impl Camera {
    #[builder]
    pub fn new(
        #[builder(default = WorldPoint::new(0.0, 0.0, -2.0))] position: WorldPoint,
        #[builder(default = WorldPoint::new(0.0, 0.0, -1.0))] target: WorldPoint,
        resolution: ScreenSize,
    ) -> Self {
        let mut camera = Camera {
            position,
            target,
            resolution,
            top_left: WorldPoint::origin(),
            top_right: WorldPoint::origin(),
            bottom_left: WorldPoint::origin(),
        };

        let ahead = (target - position).normalize();
        let right = WorldVector::y().cross(&ahead).normalize();
        let up = ahead.cross(&right).normalize();
        camera.update_view_plane(&ahead, &right, &up);

        camera
    }
}

impl Camera {
    pub fn position(&self) -> WorldPoint {
        self.position
    }

    pub fn target(&self) -> WorldPoint {
        self.target
    }

    pub fn resolution(&self) -> ScreenSize {
        self.resolution
    }

    /// Builds the primary ray through pixel `(x, y)`.
    pub fn primary_ray(&self, x: u32, y: u32) -> Ray {
        let u = x as FloatType / self.resolution.width as FloatType;
        let v = y as FloatType / self.resolution.height as FloatType;

        let point = self.top_left
            + u * (self.top_right - self.top_left)
            + v * (self.bottom_left - self.top_left);
        Ray::new(self.position, point - self.position)
    }

    /// Applies one frame of held-key input.
    ///
    /// The basis and view-plane corners are only recomputed when at least one
    /// key was held, so an idle frame does no normalization work.
    pub fn handle_input(&mut self, input: &CameraInput, delta_time: FloatType) {
        let mut speed = SPEED * delta_time;
        if input.boost {
            speed *= 2.0;
        }

        let ahead = (self.target - self.position).normalize();
        let right = WorldVector::y().cross(&ahead).normalize();
        let up = ahead.cross(&right).normalize();

        if input.forward {
            self.position += speed * ahead;
        }
        if input.backward {
            self.position -= speed * ahead;
        }
        if input.left {
            self.position -= speed * right;
        }
        if input.right {
            self.position += speed * right;
        }
        self.target = self.position + ahead;

        if input.look_up {
            self.target -= speed * up;
        }
        if input.look_down {
            self.target += speed * up;
        }
        if input.look_left {
            self.target -= speed * right;
        }
        if input.look_right {
            self.target += speed * right;
        }

        if !input.any_held() {
            return;
        }

        let ahead = (self.target - self.position).normalize();
        let up = ahead.cross(&right).normalize();
        let right = up.cross(&ahead).normalize();
        self.update_view_plane(&ahead, &right, &up);
    }

    fn update_view_plane(&mut self, ahead: &WorldVector, right: &WorldVector, up: &WorldVector) {
        let aspect = self.resolution.aspect_ratio();
        let center = self.position + VIEW_PLANE_DISTANCE * ahead;
        self.top_left = center - aspect * right + up;
        self.top_right = center + aspect * right + up;
        self.bottom_left = center - aspect * right - up;
    }
}
