use std::sync::Arc;

use crate::objects::{Intersection, Object, Plane};
use crate::sampling;
use crate::scene::intersect_scene;
use crate::texture::Texture;
use crate::transform::{Ray, Transform};
use crate::vector::Vector3;

/// Shadow occlusion test for the segment from `hit` to `target`. Only
/// blockers strictly closer than the target count; objects behind the
/// light must not shadow it.
fn occluded_toward(objects: &[Arc<Object>], hit: Vector3, target: Vector3) -> bool {
    let to_target = target - hit;
    let ray = Ray::new(hit, to_target);
    intersect_scene(objects, &ray, true)
        .first()
        .map_or(false, |front| {
            hit.distance(&front.position) < to_target.length()
        })
}

/// One incoming-light sample: the ray the light arrives along, its
/// radiance, and the distance used for attenuation.
#[derive(Debug, Clone)]
pub struct LightSample {
    pub incoming_ray: Ray,
    pub color: Vector3,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerKind {
    Hemisphere,
    HemisphereGgx,
}

/// Passed to [`Light::sample`]. `roughness` only matters to the
/// environment light; point and area lights ignore it.
#[derive(Debug, Clone, Copy)]
pub struct SamplerSettings {
    pub kind: SamplerKind,
    pub roughness: f32,
}

#[derive(Debug, Clone)]
pub struct Point {
    pub color: Vector3,
    pub intensity: f32,
    pub shadow_intensity: f32,
    pub samples: usize,
    pub xform: Transform,
}

impl Default for Point {
    fn default() -> Self {
        Self {
            color: Vector3::splat(1.0),
            intensity: 1.0,
            shadow_intensity: 0.4,
            samples: 1,
            xform: Transform::default(),
        }
    }
}

impl Point {
    fn shadow(&self, objects: &[Arc<Object>], hit: Vector3) -> f32 {
        if occluded_toward(objects, hit, self.xform.position()) {
            1.0 - self.shadow_intensity
        } else {
            1.0
        }
    }

    fn sample(&self, origin: Vector3) -> LightSample {
        let to_light = self.xform.position() - origin;
        LightSample {
            incoming_ray: Ray::new(origin, to_light),
            color: self.color * self.intensity,
            distance: to_light.length(),
        }
    }
}

/// Rectangular light. The grid plane carries the light's placement and,
/// when `render_geometry` is set, is injected into the scene's object
/// list so the light itself is visible.
#[derive(Debug, Clone)]
pub struct Area {
    pub color: Vector3,
    pub intensity: f32,
    pub shadow_intensity: f32,
    pub samples: usize,
    pub grid: Plane,
    pub render_geometry: bool,
}

impl Default for Area {
    fn default() -> Self {
        let color = Vector3::splat(1.0);
        let mut grid = Plane::default();
        grid.material.albedo = color;
        Self {
            color,
            intensity: 1.0,
            shadow_intensity: 0.4,
            samples: 64,
            grid,
            render_geometry: false,
        }
    }
}

impl Area {
    pub fn new(width: f32, height: f32, samples: usize) -> Self {
        let mut area = Self::default();
        area.grid.width = width;
        area.grid.height = height;
        area.samples = samples;
        area
    }

    /// World position of a jittered tap inside the `(u_region, v_region)`
    /// stratum of the grid.
    pub fn sample_plane(
        &self,
        u: f32,
        v: f32,
        u_region: usize,
        v_region: usize,
        surface_offset: f32,
    ) -> Vector3 {
        let regions = (self.samples as f32).sqrt().ceil();
        let step = 1.0 / regions;
        self.grid.uv_to_world(
            (u_region as f32 + u) * step,
            (v_region as f32 + v) * step,
            surface_offset,
        )
    }

    fn shadow(&self, objects: &[Arc<Object>], hit: Vector3) -> f32 {
        let regions = (self.samples as f32).sqrt().ceil() as usize;
        // Bias taps off the grid surface when the grid itself is a scene
        // object, so the light does not occlude its own shadow rays.
        let surface_offset = if self.render_geometry { 1.5 } else { 0.0 };

        let mut occluded = 0.0f32;
        for u_region in 0..regions {
            for v_region in 0..regions {
                let r1 = sampling::random();
                let r2 = sampling::random();
                let position = self.sample_plane(r1, r2, u_region, v_region, surface_offset);
                if occluded_toward(objects, hit, position) {
                    occluded += 1.0;
                }
            }
        }

        let visible = 1.0 - occluded / (regions * regions) as f32;
        visible * (1.0 - self.shadow_intensity)
    }

    fn sample(&self, origin: Vector3, direction: Vector3) -> LightSample {
        LightSample {
            incoming_ray: Ray::new(origin, direction),
            color: self.color * self.intensity,
            distance: self.grid.xform.position().distance(&origin),
        }
    }
}

/// Image-based light: six inward-facing planes forming a cube around the
/// origin, each carrying one face texture.
#[derive(Debug, Clone)]
pub struct Environment {
    pub color: Vector3,
    pub intensity: f32,
    pub shadow_intensity: f32,
    pub samples: usize,
    pub cube_map: Vec<Plane>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            color: Vector3::splat(1.0),
            intensity: 1.0,
            shadow_intensity: 0.4,
            samples: 32,
            cube_map: Vec::new(),
        }
    }
}

impl Environment {
    pub fn new(
        top: Texture,
        bottom: Texture,
        left: Texture,
        right: Texture,
        back: Texture,
        front: Texture,
    ) -> Self {
        Self {
            cube_map: Self::generate_cube_map(top, bottom, left, right, back, front),
            ..Self::default()
        }
    }

    pub fn generate_cube_map(
        top: Texture,
        bottom: Texture,
        left: Texture,
        right: Texture,
        back: Texture,
        front: Texture,
    ) -> Vec<Plane> {
        let side = 1.1f32;
        let half = side / 2.0;

        let mut cube = vec![
            Plane::new(side, side, Vector3::new(0.0, half, 0.0), Vector3::new(0.0, -1.0, 0.0)),
            Plane::new(side, side, Vector3::new(0.0, -half, 0.0), Vector3::new(0.0, 1.0, 0.0)),
            Plane::new(side, side, Vector3::new(half, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0)),
            Plane::new(side, side, Vector3::new(-half, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)),
            Plane::new(side, side, Vector3::new(0.0, 0.0, -half), Vector3::new(0.0, 0.0, 1.0)),
            Plane::new(side, side, Vector3::new(0.0, 0.0, half), Vector3::new(0.0, 0.0, -1.0)),
        ];

        cube[0].material.diffuse_texture = top;
        cube[1].material.diffuse_texture = bottom;
        cube[2].material.diffuse_texture = left;
        cube[3].material.diffuse_texture = right;
        cube[4].material.diffuse_texture = back;
        cube[5].material.diffuse_texture = front;

        cube[0].material.albedo = Vector3::new(1.0, 0.0, 0.0);
        cube[1].material.albedo = Vector3::new(0.0, 1.0, 0.0);
        cube[2].material.albedo = Vector3::new(0.0, 0.0, 1.0);
        cube[3].material.albedo = Vector3::new(0.0, 0.0, 1.0);
        cube[4].material.albedo = Vector3::new(0.0, 1.0, 0.0);
        cube[5].material.albedo = Vector3::new(1.0, 0.0, 0.0);

        cube
    }

    /// Radiance along `ray`, read from whichever face the ray exits.
    pub fn sample_cube_map(&self, ray: &Ray) -> Intersection {
        for plane in &self.cube_map {
            let mut intersection = plane.intersect(ray);
            if intersection.hit {
                let uv = plane.world_to_uv(intersection.position);
                intersection.surface_color = plane.material.diffuse_texture.sample(uv[0], uv[1]);
                return intersection;
            }
        }
        Intersection::default()
    }

    pub fn set_cube_map_pixel(&mut self, ray: &Ray, rgb: Vector3) {
        for plane in &mut self.cube_map {
            let intersection = plane.intersect(ray);
            if intersection.hit {
                let uv = plane.world_to_uv(intersection.position);
                plane.material.diffuse_texture.set_pixel(uv[0], uv[1], rgb);
            }
        }
    }

    /// Draws one radiance sample from the cube map, around `direction`.
    pub fn sample(&self, direction: Vector3, up: Vector3, settings: SamplerSettings) -> LightSample {
        let axis = Transform::new(direction, up, Vector3::default());

        let r1 = sampling::random();
        let r2 = sampling::random();
        let hemisphere = match settings.kind {
            SamplerKind::Hemisphere => sampling::sample_hemisphere(r1, r2),
            SamplerKind::HemisphereGgx => {
                sampling::importance_sample_hemisphere_ggx(r1, r2, settings.roughness)
            }
        };

        let world = hemisphere.matrix_multiply(axis.axis());
        let ray = Ray::new(Vector3::default(), world);
        let intersection = self.sample_cube_map(&ray);

        LightSample {
            incoming_ray: ray,
            color: intersection.surface_color * self.intensity,
            distance: 1.0,
        }
    }
}

/// Closed set of light kinds, tagged like [`Object`].
#[derive(Debug, Clone)]
pub enum Light {
    Point(Point),
    Area(Area),
    Environment(Environment),
}

impl Light {
    pub fn color(&self) -> Vector3 {
        match self {
            Light::Point(light) => light.color,
            Light::Area(light) => light.color,
            Light::Environment(light) => light.color,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Point(light) => light.intensity,
            Light::Area(light) => light.intensity,
            Light::Environment(light) => light.intensity,
        }
    }

    pub fn samples(&self) -> usize {
        match self {
            Light::Point(light) => light.samples,
            Light::Area(light) => light.samples,
            Light::Environment(light) => light.samples,
        }
    }

    pub fn shadow_intensity(&self) -> f32 {
        match self {
            Light::Point(light) => light.shadow_intensity,
            Light::Area(light) => light.shadow_intensity,
            Light::Environment(light) => light.shadow_intensity,
        }
    }

    /// Fraction of this light that reaches `hit`, in `[0, 1]`.
    pub fn shadow(&self, objects: &[Arc<Object>], hit: Vector3) -> f32 {
        match self {
            Light::Point(light) => light.shadow(objects, hit),
            Light::Area(light) => light.shadow(objects, hit),
            Light::Environment(_) => 1.0,
        }
    }

    /// Draws one incoming-light sample toward `origin`. `direction` and
    /// `up` seed the sampling frame; point lights ignore both.
    pub fn sample(
        &self,
        origin: Vector3,
        direction: Vector3,
        up: Vector3,
        settings: SamplerSettings,
    ) -> LightSample {
        match self {
            Light::Point(light) => light.sample(origin),
            Light::Area(light) => light.sample(origin, direction),
            Light::Environment(light) => light.sample(direction, up, settings),
        }
    }

    /// Inverse-square falloff shared by all light kinds; the environment
    /// light reports a distance of 1 so its radiance passes through.
    pub fn attenuate(&self, color: Vector3, intensity: f32, distance: f32) -> Vector3 {
        color * intensity * (1.0 / (distance * distance))
    }
}

impl From<Point> for Light {
    fn from(light: Point) -> Self {
        Light::Point(light)
    }
}

impl From<Area> for Light {
    fn from(light: Area) -> Self {
        Light::Area(light)
    }
}

impl From<Environment> for Light {
    fn from(light: Environment) -> Self {
        Light::Environment(light)
    }
}
