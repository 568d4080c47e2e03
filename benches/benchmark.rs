// Benchmarks guarding against render-throughput regressions. Run with
// `cargo bench`.

use std::sync::Arc;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};

use lumen::vector::{Vector3, Y_MINUS_AXIS};
use lumen::{Area, Camera, Cube, Light, Object, Plane, RayTracer, Scene, Settings, Sphere};

fn bench_scene() -> Scene {
    let mut objects: Vec<Arc<Object>> = Vec::new();

    let mut floor = Plane::new(
        40.0,
        40.0,
        Vector3::default(),
        Vector3::new(0.0, 1.0, 0.0),
    );
    floor.material.albedo = Vector3::splat(0.8);
    objects.push(Arc::new(Object::from(floor)));

    let mut sphere = Sphere {
        radius: 2.0,
        ..Sphere::default()
    };
    sphere.xform.set_position(Vector3::new(-2.0, 2.0, 0.0));
    sphere.material.albedo = Vector3::new(0.9, 0.3, 0.2);
    sphere.material.metalness = 1.0;
    sphere.material.roughness = 0.3;
    objects.push(Arc::new(Object::from(sphere)));

    let mut cube = Cube {
        width: 2.0,
        height: 2.0,
        length: 2.0,
        ..Cube::default()
    };
    cube.xform.set_position(Vector3::new(2.5, 1.0, -1.0));
    cube.material.albedo = Vector3::new(0.2, 0.5, 0.9);
    objects.push(Arc::new(Object::from(cube)));

    let mut light = Area::new(4.0, 4.0, 4);
    light.intensity = 14.0;
    light.grid.xform.set_position(Vector3::new(0.0, 12.0, 4.0));
    light.grid.set_direction(Vector3::new(0.0, -1.0, 0.0));

    let mut camera = Camera::new(32, 32, 1.5, 0.05);
    camera.xform.set_position(Vector3::new(0.0, 4.0, 14.0));
    camera.look_at(Vector3::new(0.0, 2.0, 0.0), Y_MINUS_AXIS);

    Scene::new(objects, vec![Arc::new(Light::from(light))], camera)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Performance regression tests");
    group.sample_size(10);

    let scene = bench_scene();

    group.bench_function("32x32, 2 samples, direct only", |b| {
        let settings = Settings {
            samples_per_pixel: 2,
            max_gi_depth: 0,
            seed: Some(1),
            progress_interval: Duration::from_millis(1),
            ..Settings::default()
        };
        let tracer = RayTracer::new(&scene, settings);
        b.iter(|| tracer.render(|_, _| {}, ""));
    });

    group.bench_function("32x32, 2 samples, one indirect bounce", |b| {
        let settings = Settings {
            samples_per_pixel: 2,
            max_gi_depth: 1,
            secondary_bounces: 4,
            seed: Some(1),
            progress_interval: Duration::from_millis(1),
            ..Settings::default()
        };
        let tracer = RayTracer::new(&scene, settings);
        b.iter(|| tracer.render(|_, _| {}, ""));
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
