use std::cell::RefCell;
use std::f32::consts::PI;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::vector::Vector3;

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_entropy());
}

/// Uniform random scalar in `[0, 1)` from the calling thread's generator.
pub fn random() -> f32 {
    RNG.with(|rng| rng.borrow_mut().gen())
}

/// Reseeds the calling thread's generator. Reseeding per pixel from a
/// fixed render seed makes the sample stream independent of which worker
/// picks the pixel up, which is what makes seeded renders reproducible.
pub fn reseed(seed: u64) {
    RNG.with(|rng| *rng.borrow_mut() = SmallRng::seed_from_u64(seed));
}

/// Uniform sample on the upper hemisphere around +Y; the Y component
/// equals `r1`.
pub fn sample_hemisphere(r1: f32, r2: f32) -> Vector3 {
    let sin_theta = (1.0 - r1 * r1).sqrt();
    let phi = 2.0 * PI * r2;
    Vector3::new(sin_theta * phi.cos(), r1, sin_theta * phi.sin())
}

/// GGX (Trowbridge-Reitz) importance sample around +Y.
/// https://blog.selfshadow.com/publications/s2013-shading-course/karis/s2013_pbs_epic_notes_v2.pdf
pub fn importance_sample_hemisphere_ggx(r1: f32, r2: f32, roughness: f32) -> Vector3 {
    let a = roughness * roughness;
    let phi = 2.0 * PI * r1;
    let cos_theta = ((1.0 - r2) / (1.0 + (a * a - 1.0) * r2)).sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    Vector3::new(sin_theta * phi.cos(), cos_theta, sin_theta * phi.sin())
}

/// Point on the unit circle in the XZ plane.
pub fn sample_circle(r: f32) -> Vector3 {
    let phi = 2.0 * PI * r;
    Vector3::new(phi.cos(), 0.0, phi.sin())
}
