use std::sync::Arc;
use std::time::Duration;

use lumen::vector::{Vector3, Y_MINUS_AXIS};
use lumen::{
    Area, Camera, Cube, Environment, Light, Object, Pixels, Plane, Point, RayTracer, Ray, Scene,
    Settings, Sphere, Texture,
};

fn no_save(_: &Pixels, _: &str) {}

fn quick_settings() -> Settings {
    Settings {
        progress_interval: Duration::from_millis(1),
        ..Settings::default()
    }
}

fn luminance(color: Vector3) -> f32 {
    (color[0] + color[1] + color[2]) / 3.0
}

fn solid_texture(rgb: Vector3, size: usize) -> Texture {
    let mut texture = Texture::new(size, size);
    for x in 0..size {
        for y in 0..size {
            texture.set_pixel(x as f32 / size as f32, y as f32 / size as f32, rgb);
        }
    }
    texture
}

#[test]
fn empty_scene_renders_the_background() {
    let scene = Scene::new(Vec::new(), vec![Arc::new(Light::from(Point::default()))], {
        let mut camera = Camera::new(1, 1, 1.0, 0.01);
        camera.xform.set_position(Vector3::new(0.0, 0.0, 5.0));
        camera
    });

    let settings = Settings {
        background_color: Vector3::new(0.2, 0.3, 0.4),
        samples_per_pixel: 4,
        seed: Some(1),
        ..quick_settings()
    };

    let pixels = RayTracer::new(&scene, settings).render(no_save, "");
    assert!((pixels[0][0] - 0.2).abs() < 1e-5);
    assert!((pixels[1][0] - 0.3).abs() < 1e-5);
    assert!((pixels[2][0] - 0.4).abs() < 1e-5);
}

#[test]
fn red_sphere_head_on_is_red() {
    let mut sphere = Sphere::default();
    sphere.material.albedo = Vector3::new(1.0, 0.0, 0.0);
    sphere.material.metalness = 0.0;
    sphere.material.roughness = 1.0;

    let mut light = Point::default();
    light.intensity = 18.0;
    light.xform.set_position(Vector3::new(0.0, 10.0, 0.0));

    let mut camera = Camera::new(1, 1, 1.0, 0.01);
    camera.xform.set_position(Vector3::new(0.0, 0.0, 5.0));
    camera.look_at(Vector3::default(), Y_MINUS_AXIS);

    let scene = Scene::new(
        vec![Arc::new(Object::from(sphere))],
        vec![Arc::new(Light::from(light))],
        camera,
    );

    let settings = Settings {
        samples_per_pixel: 1,
        max_depth: 0,
        max_gi_depth: 0,
        seed: Some(2),
        ..quick_settings()
    };

    let pixels = RayTracer::new(&scene, settings).render(no_save, "");
    let (r, g, b) = (pixels[0][0], pixels[1][0], pixels[2][0]);
    assert!(r > g && r > b, "expected red to dominate, got ({r}, {g}, {b})");
    assert!((0.0..=0.2).contains(&g));
    assert!((0.0..=0.2).contains(&b));
}

fn cornell_box(light_intensity: f32) -> Scene {
    let size = 10.0f32;
    let half = size / 2.0;

    let mut objects: Vec<Arc<Object>> = Vec::new();

    // Walls overlap a little at the corners; the plane bounds are strict
    // and a corner ray slipping between two exact edges would read as a
    // miss.
    let wall = |position: Vector3, direction: Vector3, albedo: Vector3| {
        let mut plane = Plane::new(size + 0.2, size + 0.2, position, direction);
        plane.material.albedo = albedo;
        plane.material.roughness = 1.0;
        Arc::new(Object::from(plane))
    };

    let white = Vector3::splat(0.75);
    objects.push(wall(Vector3::new(0.0, -half, 0.0), Vector3::new(0.0, 1.0, 0.0), white));
    objects.push(wall(Vector3::new(0.0, half, 0.0), Vector3::new(0.0, -1.0, 0.0), white));
    objects.push(wall(
        Vector3::new(-half, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.75, 0.2, 0.2),
    ));
    objects.push(wall(
        Vector3::new(half, 0.0, 0.0),
        Vector3::new(-1.0, 0.0, 0.0),
        Vector3::new(0.2, 0.75, 0.2),
    ));
    objects.push(wall(Vector3::new(0.0, 0.0, -half), Vector3::new(0.0, 0.0, 1.0), white));
    objects.push(wall(Vector3::new(0.0, 0.0, half), Vector3::new(0.0, 0.0, -1.0), white));

    let cube_positions = [
        Vector3::new(-2.0, -4.5, 0.0),
        Vector3::new(0.0, -4.5, 2.0),
        Vector3::new(2.0, -4.5, -1.0),
    ];
    for position in cube_positions {
        let mut cube = Cube::default();
        cube.xform.set_position(position);
        cube.material.albedo = Vector3::splat(0.9);
        cube.material.roughness = 1.0;
        objects.push(Arc::new(Object::from(cube)));
    }

    // Off-center ceiling light, so the cubes cast shadows the camera can
    // actually see instead of hiding them directly underneath.
    let mut ceiling_light = Area::new(3.0, 3.0, 4);
    ceiling_light.intensity = light_intensity;
    ceiling_light.shadow_intensity = 0.2;
    ceiling_light.grid.xform.set_position(Vector3::new(-4.0, 4.9, 0.0));
    ceiling_light.grid.set_direction(Vector3::new(0.0, -1.0, 0.0));

    let mut camera = Camera::new(12, 12, 1.5, 0.25);
    camera.xform.set_position(Vector3::new(0.0, 0.0, 4.2));
    camera.look_at(Vector3::new(0.0, -1.0, 0.0), Y_MINUS_AXIS);

    Scene::new(objects, vec![Arc::new(Light::from(ceiling_light))], camera)
}

#[test]
fn cornell_box_has_no_black_pixels() {
    let scene = cornell_box(12.0);
    let settings = Settings {
        samples_per_pixel: 2,
        max_depth: 1,
        max_gi_depth: 1,
        secondary_bounces: 8,
        seed: Some(3),
        ..quick_settings()
    };

    let pixels = RayTracer::new(&scene, settings).render(no_save, "");
    for channel in &pixels {
        for i in 0..channel.area() {
            assert!(channel[i].is_finite());
            assert!(channel[i] > 0.0, "pixel {i} is exactly zero");
            assert!(channel[i] <= 1.0);
        }
    }
}

#[test]
fn cornell_box_shadows_are_darker_than_lit_floor() {
    let scene = cornell_box(16.0);
    let settings = Settings {
        max_gi_depth: 0,
        seed: Some(4),
        ..quick_settings()
    };
    let tracer = RayTracer::new(&scene, settings);

    let camera_position = Vector3::new(0.0, 0.0, 4.2);
    // The middle cube shadows the floor on its +X side with the light
    // sitting toward -X; the lit target is open floor further out.
    let shadowed_target = Vector3::new(0.8, -5.0, 2.2);
    let lit_target = Vector3::new(3.5, -5.0, 2.0);

    let shadowed = tracer.trace(
        &Ray::new(camera_position, shadowed_target - camera_position),
        0,
    );
    let lit = tracer.trace(&Ray::new(camera_position, lit_target - camera_position), 0);

    assert!(shadowed.hit && lit.hit);
    let (dark, bright) = (
        luminance(shadowed.surface_color),
        luminance(lit.surface_color),
    );
    assert!(
        bright >= dark * 2.0,
        "lit floor {bright} not twice the shadowed floor {dark}"
    );
}

#[test]
fn cornell_box_walls_bleed_onto_cube_faces() {
    let scene = cornell_box(12.0);
    let settings = Settings {
        max_depth: 2,
        max_gi_depth: 1,
        secondary_bounces: 64,
        seed: Some(6),
        ..quick_settings()
    };
    let tracer = RayTracer::new(&scene, settings);

    // The -X face of the left cube looks straight at the red wall, so
    // its indirect gather should pull red above green.
    let face_target = Vector3::new(-2.5, -4.5, 0.0);
    let origin = Vector3::new(-4.0, -3.0, 0.0);
    let face = tracer.trace(&Ray::new(origin, face_target - origin), 0);

    assert!(face.hit);
    let color = face.surface_color;
    assert!(
        color[0] > color[1],
        "expected red bleed on the cube face, got {color:?}"
    );
}

#[test]
fn mirror_sphere_reflects_the_environment() {
    let gray = Vector3::splat(0.5);
    let face = || solid_texture(gray, 4);
    let environment = Environment::new(face(), face(), face(), face(), face(), face());

    let mut sphere = Sphere::default();
    sphere.material.albedo = Vector3::splat(1.0);
    sphere.material.metalness = 1.0;
    sphere.material.roughness = 0.05;
    sphere.material.reflection_depth = 2;
    sphere.material.reflection_samples = 8;

    let mut camera = Camera::new(4, 4, 1.0, 0.01);
    camera.xform.set_position(Vector3::new(0.0, 0.0, 5.0));
    camera.look_at(Vector3::default(), Y_MINUS_AXIS);

    let scene = Scene::new(
        vec![Arc::new(Object::from(sphere))],
        vec![Arc::new(Light::from(environment))],
        camera,
    );

    let settings = Settings {
        max_gi_depth: 0,
        seed: Some(7),
        ..quick_settings()
    };
    let tracer = RayTracer::new(&scene, settings);

    // Glancing ray: hits the silhouette where Fresnel pushes toward 1.
    let glancing = tracer.trace(
        &Ray::new(Vector3::new(0.97, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0)),
        0,
    );
    assert!(glancing.hit);

    let color = glancing.surface_color;
    let spread = color[0].max(color[1]).max(color[2]) - color[0].min(color[1]).min(color[2]);
    assert!(
        spread < 0.15,
        "environment reflection should stay neutral, got {color:?}"
    );
    assert!(luminance(color) > 0.0, "silhouette should pick up radiance");
    for i in 0..3 {
        assert!((0.0..=1.0).contains(&color[i]));
    }
}

#[test]
fn seeded_renders_are_bitwise_identical() {
    let mut sphere = Sphere::default();
    sphere.material.albedo = Vector3::new(0.8, 0.4, 0.2);

    let mut light = Point::default();
    light.intensity = 10.0;
    light.xform.set_position(Vector3::new(3.0, 8.0, 3.0));

    let mut camera = Camera::new(8, 8, 1.0, 0.05);
    camera.xform.set_position(Vector3::new(0.0, 1.0, 6.0));
    camera.look_at(Vector3::default(), Y_MINUS_AXIS);

    let scene = Scene::new(
        vec![Arc::new(Object::from(sphere))],
        vec![Arc::new(Light::from(light))],
        camera,
    );

    let settings = Settings {
        samples_per_pixel: 2,
        max_gi_depth: 1,
        secondary_bounces: 2,
        seed: Some(42),
        ..quick_settings()
    };

    let tracer = RayTracer::new(&scene, settings);
    let first = tracer.render(no_save, "");
    let second = tracer.render(no_save, "");

    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.data(), b.data());
    }
}

#[test]
fn save_sink_receives_progress_snapshots() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let scene = cornell_box(6.0);
    let settings = Settings {
        samples_per_pixel: 2,
        max_gi_depth: 0,
        seed: Some(8),
        ..quick_settings()
    };

    let calls = AtomicUsize::new(0);
    let pixels = RayTracer::new(&scene, settings).render(
        |snapshot: &Pixels, path: &str| {
            calls.fetch_add(1, Ordering::Relaxed);
            assert_eq!(path, "progress.png");
            assert_eq!(snapshot[0].area(), 12 * 12);
        },
        "progress.png",
    );

    assert!(calls.load(Ordering::Relaxed) > 0);
    assert_eq!(pixels[0].area(), 12 * 12);
}
