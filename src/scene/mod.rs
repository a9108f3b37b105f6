pub mod primitives;

use std::f32::consts::FRAC_PI_4;
use std::path::Path;
use std::sync::Arc;

use ordered_float::OrderedFloat;

use crate::geometry::{FloatType, HitKind, Ray, WorldPoint, WorldTransform, WorldVector};
use crate::surface::{Surface, Texture};
use crate::util::Rgba;
use primitives::{Cube, Plane, Primitive, Quad, Sphere, Torus};

/// Index of the bouncing ball in the sample room's object list.
const BOUNCING_SPHERE_ID: usize = 7;
/// Index of the spinning cube in the sample room's object list.
const SPINNING_CUBE_ID: usize = 8;

fn light_positions() -> [WorldVector; 4] {
    [
        WorldVector::new(-1.0, 1.5, -1.0),
        WorldVector::new(1.0, 1.5, -1.0),
        WorldVector::new(1.0, 1.5, 1.0),
        WorldVector::new(-1.0, 1.5, 1.0),
    ]
}

/// Fixed collections of objects and area lights, plus the animation clock.
///
/// Object ids and light ids are the indices into their respective lists;
/// neither list changes length after construction.
pub struct Scene {
    objects: Vec<Primitive>,
    lights: Vec<Quad>,
    animation_time: FloatType,
}

impl Scene {
    pub fn new(objects: Vec<Primitive>, lights: Vec<Quad>) -> Scene {
        Scene {
            objects,
            lights,
            animation_time: 0.0,
        }
    }

    /// The sample room: six walls, a huge sphere rounding the far corners, a
    /// bouncing ball, a spinning cube, a tilted torus and four area lights.
    /// Texture files that fail to load degrade that wall to the procedural
    /// checkerboard.
    pub fn room(asset_root: &Path) -> Scene {
        let tiles = load_texture(asset_root, "tiles.jpg");
        let wood1 = load_texture(asset_root, "wood1.jpg");
        let wood2 = load_texture(asset_root, "wood2.jpg");

        let torus_transform = WorldTransform::new_translation(&WorldVector::new(-0.25, 0.0, 2.0))
            * WorldTransform::new_rotation(WorldVector::x() * FRAC_PI_4);

        let objects: Vec<Primitive> = vec![
            // Floor and ceiling keep the checkerboard
            Plane::new(0, WorldVector::y(), 1.0).into(),
            textured_plane(1, WorldVector::x(), 3.0, wood1),
            textured_plane(2, -WorldVector::x(), 2.99, wood2),
            Plane::new(3, -WorldVector::y(), 2.0).into(),
            textured_plane(4, WorldVector::z(), 3.0, tiles.clone()),
            textured_plane(5, -WorldVector::z(), 3.99, tiles),
            // Oversized sphere that rounds off the room corners
            Sphere::new(6, WorldPoint::new(0.0, 2.5, -3.07), 8.0).into(),
            // Bouncing ball, repositioned by set_time
            Sphere::new(7, WorldPoint::origin(), 0.6).into(),
            // Spinning cube, transformed by set_time
            Cube::new(8, WorldPoint::origin(), WorldVector::new(1.15, 1.15, 1.15)).into(),
            Torus::new(9, 0.8, 0.25, torus_transform).into(),
        ];

        let lights = (0..light_positions().len())
            .map(|id| Quad::new(id as i32, 0.5, WorldTransform::identity()))
            .collect();

        let mut scene = Scene::new(objects, lights);
        scene.set_time(0.0);
        scene
    }

    pub fn objects(&self) -> &[Primitive] {
        &self.objects
    }

    pub fn lights(&self) -> &[Quad] {
        &self.lights
    }

    pub fn animation_time(&self) -> FloatType {
        self.animation_time
    }

    /// Advances the animated subset of the scene to time `t` (seconds).
    pub fn set_time(&mut self, t: FloatType) {
        self.animation_time = t;

        let spin = WorldTransform::new_translation(&WorldVector::new(1.8, 0.0, 2.5))
            * WorldTransform::new_rotation(WorldVector::y() * (t * 0.5))
            * WorldTransform::new_rotation(WorldVector::x() * FRAC_PI_4)
            * WorldTransform::new_rotation(WorldVector::z() * FRAC_PI_4);
        if let Some(Primitive::Cube(cube)) = self.objects.get_mut(SPINNING_CUBE_ID) {
            cube.set_transform(spin);
        }

        // Periodic parabolic bounce, folded back into [0, 1]
        let mut tm = 1.0 - (t % 2.0 - 1.0).powi(2);
        if tm > 1.0 {
            tm = 2.0 - tm;
        }
        if let Some(Primitive::Sphere(sphere)) = self.objects.get_mut(BOUNCING_SPHERE_ID) {
            sphere.set_position(WorldPoint::new(-1.8, -0.4 + tm, 1.0));
        }

        // The lights are stationary; their placement is simply re-applied
        // along with everything else that depends on time.
        for (light, position) in self.lights.iter_mut().zip(light_positions()) {
            light.set_transform(WorldTransform::new_translation(&position));
        }
    }

    /// Tests the ray against every object and light (linear scan, no
    /// acceleration structure) and registers the globally nearest hit on the
    /// ray's record.
    pub fn evaluate_ray(&self, ray: &mut Ray) {
        let object_hit = self
            .objects
            .iter()
            .filter_map(|object| object.intersect(ray).map(|t| (OrderedFloat(t), object.id())))
            .min();
        let light_hit = self
            .lights
            .iter()
            .filter_map(|light| light.intersect(ray).map(|t| (OrderedFloat(t), light.id())))
            .min();

        // A light only beats an object when strictly closer
        match (object_hit, light_hit) {
            (Some((object_t, _)), Some((light_t, id))) if light_t < object_t => {
                ray.register_hit(id, light_t.0);
                ray.register_hit_kind(HitKind::Light);
            }
            (Some((t, id)), _) => {
                ray.register_hit(id, t.0);
                ray.register_hit_kind(HitKind::Object);
            }
            (None, Some((t, id))) => {
                ray.register_hit(id, t.0);
                ray.register_hit_kind(HitKind::Light);
            }
            (None, None) => {}
        }
    }

    /// Does any object block the ray before its distance limit? Lights do not
    /// cast shadows on themselves.
    pub fn is_occluded(&self, ray: &Ray) -> bool {
        self.objects.iter().any(|object| object.is_occluded(ray))
    }

    /// Stratified sample of a point on one of the area lights from two
    /// uniform random numbers in `[0, 1)`. `r0` picks the light (equal bands)
    /// and is remapped for reuse across the quad together with `r1`.
    ///
    /// Panics if the scene has no lights.
    pub fn random_point_on_light(&self, r0: FloatType, r1: FloatType) -> WorldPoint {
        let count = self.lights.len();
        let index = ((r0 * count as FloatType) as usize).min(count - 1);
        let light = &self.lights[index];

        // Remap r0 into the selected stratum for reuse
        let stratum = index as FloatType / count as FloatType;
        let r2 = (r0 - stratum) / (1.0 - stratum);

        let half = light.half_size();
        let transform = light.transform();
        let corner1 = transform.transform_point(&WorldPoint::new(-half, 0.0, -half));
        let corner2 = transform.transform_point(&WorldPoint::new(half, 0.0, -half));
        let corner3 = transform.transform_point(&WorldPoint::new(-half, 0.0, half));

        corner1 + r2 * (corner2 - corner1) + r1 * (corner3 - corner1)
    }

    /// Albedo of the recorded hit. Out-of-range ids resolve to transparent
    /// black rather than faulting.
    pub fn albedo(&self, point: WorldPoint, id: usize, kind: HitKind) -> Rgba {
        match kind {
            HitKind::Object => self.objects.get(id).map(|object| object.albedo(point)),
            HitKind::Light => self.lights.get(id).map(|light| light.albedo(point)),
        }
        .unwrap_or(Rgba::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Surface normal of the recorded hit; zero vector for out-of-range ids.
    pub fn normal(&self, point: WorldPoint, id: usize, kind: HitKind) -> WorldVector {
        match kind {
            HitKind::Object => self.objects.get(id).map(|object| object.normal(point)),
            HitKind::Light => self.lights.get(id).map(|light| light.normal(point)),
        }
        .unwrap_or_else(WorldVector::zeros)
    }
}

fn load_texture(asset_root: &Path, name: &str) -> Option<Arc<dyn Texture>> {
    match Surface::load(asset_root.join(name)) {
        Ok(surface) => Some(Arc::new(surface)),
        Err(error) => {
            log::warn!("could not load texture {name}: {error}, using checkerboard");
            None
        }
    }
}

fn textured_plane(
    id: i32,
    normal: WorldVector,
    distance: FloatType,
    texture: Option<Arc<dyn Texture>>,
) -> Primitive {
    match texture {
        Some(texture) => Plane::textured(id, normal, distance, texture).into(),
        None => Plane::new(id, normal, distance).into(),
    }
}
