use std::f32::consts::PI;
use std::sync::Arc;

use crate::lights::{Light, SamplerKind, SamplerSettings};
use crate::objects::Object;
use crate::sampling;
use crate::scene::intersect_scene;
use crate::texture::Texture;
use crate::transform::{Ray, Transform};
use crate::vector::Vector3;

/// Material parameters plus the Cook-Torrance BRDF that evaluates them.
/// Follows the metalness/roughness workflow from
/// https://learnopengl.com/PBR/Theory
#[derive(Debug, Clone)]
pub struct Shader {
    pub albedo: Vector3,
    pub roughness: f32,
    pub metalness: f32,
    pub ior: f32,
    pub emission: f32,
    pub diffuse_texture: Texture,
    pub reflection_depth: usize,
    pub reflection_samples: usize,
}

impl Default for Shader {
    fn default() -> Self {
        Self {
            albedo: Vector3::new(1.0, 0.0, 0.0),
            roughness: 1.0,
            metalness: 0.0,
            ior: 1.2,
            emission: 0.0,
            diffuse_texture: Texture::default(),
            reflection_depth: 0,
            reflection_samples: 0,
        }
    }
}

impl Shader {
    /// Outgoing radiance at the shading point. Only reflection is
    /// implemented, so this forwards straight to the BRDF.
    pub fn bsdf(
        &self,
        ray: &Ray,
        normal: Vector3,
        hit: Vector3,
        objects: &[Arc<Object>],
        lights: &[Arc<Light>],
    ) -> Vector3 {
        self.brdf(ray, normal, hit, objects, lights)
    }

    fn brdf(
        &self,
        ray: &Ray,
        normal: Vector3,
        hit: Vector3,
        objects: &[Arc<Object>],
        lights: &[Arc<Light>],
    ) -> Vector3 {
        let view = (ray.origin() - hit).normalized();
        let reflection = Ray::reflect(normal, view);
        let n_dot_v = normal.dot(&view);
        let f0 = Vector3::mix(&Vector3::splat(0.04), &self.albedo, self.metalness);

        let environment = lights
            .iter()
            .find_map(|light| match light.as_ref() {
                Light::Environment(environment) => Some(environment),
                _ => None,
            });

        // Ambient term: a flat floor, or irradiance gathered from the
        // environment map when one is present.
        let pdf = 1.0 / (2.0 * PI);
        let mut ambient = self.albedo * 0.03;
        if let Some(environment) = environment {
            let fresnel = Self::fresnel(n_dot_v.max(0.0), f0);
            let k_diffuse = (Vector3::splat(1.0) - fresnel) * (1.0 - self.metalness);

            let uniform = SamplerSettings {
                kind: SamplerKind::Hemisphere,
                roughness: 1.0,
            };
            let mut radiance = Vector3::default();
            for _ in 0..environment.samples {
                radiance += environment.sample(normal, reflection, uniform).color;
            }
            radiance = radiance * (1.0 / environment.samples as f32) * pdf;
            ambient = k_diffuse * (radiance * self.albedo) * 0.1;
        }

        let scene_reflections = self.scene_reflections(
            ray.origin(),
            hit,
            normal,
            self.roughness,
            self.reflection_depth,
            self.reflection_samples,
            objects,
        );

        let ggx = SamplerSettings {
            kind: SamplerKind::HemisphereGgx,
            roughness: self.roughness,
        };

        let mut outgoing = Vector3::default();
        for light in lights {
            let shadow = light.shadow(objects, hit);
            let samples = light.samples();

            let mut accumulated = Vector3::default();
            for _ in 0..samples {
                let light_sample = light.sample(hit, reflection, normal, ggx);
                let light_direction = light_sample.incoming_ray.direction();

                let half = (view + light_direction).normalized();
                let h_dot_v = half.dot(&view);
                let n_dot_l = normal.dot(&light_direction);

                let mut color = light_sample.color;
                if environment.is_some() {
                    color += scene_reflections * 100.0;
                }
                let radiance = light.attenuate(color, light.intensity(), light_sample.distance);

                let distribution = Self::distribution(normal, half, self.roughness);
                let geometry = Self::geometry(normal, view, light_direction, self.roughness);
                let fresnel = Self::fresnel(h_dot_v.max(0.0), f0);

                let numerator = fresnel * distribution * geometry;
                let denominator = 4.0 * n_dot_v.max(0.0) * n_dot_l.max(0.0);
                let specular = numerator / denominator.max(0.001);

                let k_diffuse = (Vector3::splat(1.0) - fresnel) * (1.0 - self.metalness);

                accumulated +=
                    ((k_diffuse * self.albedo) / PI + specular) * radiance * n_dot_l.max(0.0);
            }
            outgoing += accumulated * (1.0 / samples as f32) * shadow;
        }

        let mut color = ambient + outgoing;
        // Reinhard tonemap, then gamma.
        color = color / (color + Vector3::splat(1.0));
        color.pow(1.0 / 2.2);
        color
    }

    /// Glossy self-reflection: walks a short chain of GGX-importance
    /// probes through the scene and averages the surface colors it sees.
    /// Returns zero as soon as an iteration finds nothing.
    fn scene_reflections(
        &self,
        origin: Vector3,
        hit: Vector3,
        normal: Vector3,
        roughness: f32,
        depth: usize,
        samples: usize,
        objects: &[Arc<Object>],
    ) -> Vector3 {
        if samples == 0 {
            return Vector3::default();
        }

        let mut origin = origin;
        let mut hit = hit;
        let mut normal = normal;

        let mut color = Vector3::default();
        for _ in 0..depth {
            let mut last = None;
            for _ in 0..samples {
                let view = (origin - hit).normalized();
                let reflection = Ray::reflect(normal, view);
                let axis = Transform::new(reflection, view, hit);

                let r1 = sampling::random();
                let r2 = sampling::random();
                let sample = sampling::importance_sample_hemisphere_ggx(r1, r2, roughness);
                let ray = Ray::new(hit, sample.matrix_multiply(axis.axis()));

                let intersections = intersect_scene(objects, &ray, true);
                let Some(front) = intersections.into_iter().next() else {
                    return Vector3::default();
                };
                color += front.surface_color;
                last = Some(front);
            }

            let Some(intersection) = last else {
                return Vector3::default();
            };
            let Some(index) = intersection.object else {
                return Vector3::default();
            };
            let object = &objects[index];
            origin = hit;
            hit = intersection.position + normal * 0.0001;
            normal = object.normal_at(intersection.position);
            color /= samples as f32;
        }

        color
    }

    /// Schlick's Fresnel approximation.
    pub fn fresnel(incidence_angle: f32, f0: Vector3) -> Vector3 {
        f0 + (Vector3::splat(1.0) - f0) * (1.0 - incidence_angle).powi(5)
    }

    /// Smith geometry term built from Schlick-GGX halves.
    pub fn geometry(normal: Vector3, view: Vector3, light_direction: Vector3, roughness: f32) -> f32 {
        let schlick_ggx = |n_dot_v: f32| {
            let r = roughness + 1.0;
            let k = (r * r) / 8.0;
            n_dot_v / (n_dot_v * (1.0 - k) + k)
        };

        let n_dot_v = normal.dot(&view).max(0.0);
        let n_dot_l = normal.dot(&light_direction).max(0.0);
        schlick_ggx(n_dot_v) * schlick_ggx(n_dot_l)
    }

    /// GGX (Trowbridge-Reitz) normal distribution.
    pub fn distribution(normal: Vector3, half: Vector3, roughness: f32) -> f32 {
        let a = roughness * roughness;
        let a2 = a * a;
        let n_dot_h = normal.dot(&half).max(0.0);

        let denominator = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
        a2 / (PI * denominator * denominator).max(0.001)
    }
}
