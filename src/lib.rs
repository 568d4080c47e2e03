//! CPU path tracer built around a Cook-Torrance microfacet BRDF.
//!
//! A [`scene::Scene`] holds primitives, lights, and a camera; a
//! [`tracer::RayTracer`] renders it into the camera's viewport across a
//! pool of worker threads, periodically handing progressive snapshots to
//! a caller-supplied save sink.

pub mod camera;
pub mod lights;
pub mod logger;
pub mod matrix;
pub mod objects;
pub mod pool;
pub mod queue;
pub mod sampling;
pub mod scene;
pub mod shader;
pub mod texture;
pub mod tracer;
pub mod transform;
pub mod vector;
pub mod viewport;

pub use camera::Camera;
pub use lights::{Area, Environment, Light, LightSample, Point, SamplerKind, SamplerSettings};
pub use objects::{Cube, Intersection, Object, Plane, Sphere};
pub use scene::{intersect_scene, Scene};
pub use shader::Shader;
pub use texture::Texture;
pub use tracer::{RayTracer, Settings};
pub use transform::{Ray, Transform};
pub use vector::{Vector, Vector2, Vector3};
pub use viewport::{Pixels, Viewport};
