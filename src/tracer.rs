use std::f32::consts::PI;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::camera::Camera;
use crate::objects::Intersection;
use crate::pool;
use crate::sampling;
use crate::scene::{intersect_scene, Scene};
use crate::transform::{Ray, Transform};
use crate::vector::Vector3;
use crate::viewport::Pixels;

const CHUNK_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Returned by `trace` on a miss.
    pub background_color: Vector3,
    /// Primary rays averaged per pixel.
    pub samples_per_pixel: usize,
    /// Recursion cap for `trace`; deeper calls return an empty
    /// intersection.
    pub max_depth: usize,
    /// Depth below which indirect bounces are gathered.
    pub max_gi_depth: usize,
    /// Monte Carlo taps per indirect gather.
    pub secondary_bounces: usize,
    /// Seeds the pixel shuffle and the per-pixel sample streams; a fixed
    /// seed makes renders bitwise reproducible.
    pub seed: Option<u64>,
    /// Pause between progress snapshots.
    pub progress_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            background_color: Vector3::default(),
            samples_per_pixel: 20,
            max_depth: 2,
            max_gi_depth: 2,
            secondary_bounces: 10,
            seed: None,
            progress_interval: Duration::from_secs(2),
        }
    }
}

fn pixel_seed(seed: u64, index: usize) -> u64 {
    (index as u64)
        .wrapping_mul(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(seed)
}

pub struct RayTracer<'scene> {
    scene: &'scene Scene,
    settings: Settings,
}

impl<'scene> RayTracer<'scene> {
    pub fn new(scene: &'scene Scene, settings: Settings) -> Self {
        Self { scene, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Renders every pixel of the scene's viewport and returns the final
    /// channel snapshot. `save` is invoked periodically from a progress
    /// thread with whatever the viewport holds at that moment; the
    /// finished frame is only guaranteed in the returned snapshot.
    pub fn render<F>(&self, save: F, path: &str) -> Pixels
    where
        F: Fn(&Pixels, &str) + Sync,
    {
        let camera = &self.scene.camera;
        let area = camera.viewport().area();

        // Shuffled pixel order makes the preview resolve everywhere at
        // once instead of sweeping top to bottom.
        let mut indices: Vec<usize> = (0..area).collect();
        match self.settings.seed {
            Some(seed) => indices.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => indices.shuffle(&mut rand::thread_rng()),
        }

        let job = |i: usize| {
            let index = indices[i];
            if let Some(seed) = self.settings.seed {
                sampling::reseed(pixel_seed(seed, index));
            }
            log::trace!("rendering pixel {index}");

            let mut color = Vector3::default();
            for _ in 0..self.settings.samples_per_pixel {
                let ray = camera.create_ray(index, Camera::DEFAULT_JITTER);
                color += self.trace(&ray, 0).surface_color;
            }
            color *= 1.0 / self.settings.samples_per_pixel as f32;
            color.clamp(0.0, 0.9999);

            camera.viewport().set_pixel(index, color[0], color[1], color[2]);
        };

        let start = Instant::now();
        pool::run_with_callback(
            job,
            || {
                save(&camera.viewport().pixels(), path);
                std::thread::sleep(self.settings.progress_interval);
            },
            area,
            CHUNK_SIZE,
            0,
        );
        log::info!(
            "rendered {} pixels in {:.2}s",
            area,
            start.elapsed().as_secs_f32()
        );

        camera.viewport().pixels()
    }

    /// Shades the closest intersection along `ray`, recursing through
    /// the indirect gather while `depth` allows.
    pub fn trace(&self, ray: &Ray, depth: usize) -> Intersection {
        if depth > self.settings.max_depth {
            return Intersection::default();
        }

        let mut intersections = intersect_scene(&self.scene.objects, ray, true);
        if intersections.is_empty() {
            return Intersection {
                hit: false,
                position: Vector3::default(),
                surface_color: self.settings.background_color,
                object: None,
            };
        }

        let mut intersection = intersections.swap_remove(0);
        let Some(index) = intersection.object else {
            return Intersection::default();
        };
        let object = &self.scene.objects[index];
        let normal = object.normal_at(intersection.position);
        let hit = intersection.position + normal * 0.0001;

        let direct = object.material().bsdf(
            ray,
            normal,
            hit,
            &self.scene.objects,
            &self.scene.lights,
        );

        let indirect = if depth < self.settings.max_gi_depth {
            self.global_illumination(ray, normal, hit, depth)
        } else {
            Vector3::default()
        };

        let mut irradiance = (direct / PI + indirect * 2.0) * object.material().albedo;
        irradiance.clamp(0.0, 1.0);

        intersection.surface_color = irradiance;
        intersection
    }

    /// Indirect irradiance gathered over the hemisphere above `hit`.
    ///
    /// Each tap contributes `color * r1` only: the uniform-hemisphere
    /// 1/pdf of 2*pi cancels against the Lambertian 1/pi that `trace`
    /// divides the direct term by, and what is left over is the literal
    /// `indirect * 2` applied there. Keep the two sites in sync.
    fn global_illumination(
        &self,
        ray: &Ray,
        normal: Vector3,
        hit: Vector3,
        depth: usize,
    ) -> Vector3 {
        if self.settings.secondary_bounces == 0 {
            return Vector3::default();
        }

        let axis = Transform::new(normal, (ray.origin() - hit).normalized(), hit);

        let mut indirect = Vector3::default();
        for _ in 0..self.settings.secondary_bounces {
            let r1 = sampling::random();
            let r2 = sampling::random();

            let sample = sampling::sample_hemisphere(r1, r2);
            let world = sample.matrix_multiply(axis.axis());
            let indirect_ray = Ray::new(axis.position(), world);

            let bounce = self.trace(&indirect_ray, depth + 1);
            let mut color = bounce.surface_color * r1;
            color.set_nans_or_infs(0.0);
            indirect += color;
        }
        indirect *= 1.0 / self.settings.secondary_bounces as f32;
        // Deeper bounces are damped by their recursion depth.
        indirect *= 1.0 / (depth + 1) as f32;
        indirect
    }
}
