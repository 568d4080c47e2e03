use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use image::RgbImage;
use log::LevelFilter;

use lumen::matrix::Matrix;
use lumen::vector::{Vector3, Y_MINUS_AXIS};
use lumen::{
    Area, Camera, Cube, Environment, Light, Object, Pixels, Plane, Point, RayTracer, Scene,
    Settings, Sphere, Texture,
};

fn save_image(pixels: &Pixels, path: &str) {
    let width = pixels[0].columns();
    let height = pixels[0].rows();

    let mut image = RgbImage::new(width as u32, height as u32);
    for y in 0..height {
        for x in 0..width {
            let to_byte = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
            image.put_pixel(
                x as u32,
                y as u32,
                image::Rgb([
                    to_byte(pixels[0].get(y, x)),
                    to_byte(pixels[1].get(y, x)),
                    to_byte(pixels[2].get(y, x)),
                ]),
            );
        }
    }

    if let Err(error) = image.save(path) {
        log::error!("failed to save {path}: {error}");
    }
}

fn load_texture(path: &Path) -> Result<Texture> {
    let image = image::open(path)
        .with_context(|| format!("loading texture {}", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();

    let mut channels: [Matrix<f32>; 4] =
        std::array::from_fn(|_| Matrix::new(height as usize, width as usize));
    for (x, y, pixel) in image.enumerate_pixels() {
        for (c, channel) in channels.iter_mut().enumerate() {
            channel.set(y as usize, x as usize, pixel[c] as f32 / 255.0);
        }
    }

    Ok(Texture::from_channels(channels)?)
}

fn load_environment(directory: &Path) -> Result<Environment> {
    let face = |name: &str| load_texture(&directory.join(name));
    Ok(Environment::new(
        face("Top.png")?,
        face("Bottom.png")?,
        face("Left.png")?,
        face("Right.png")?,
        face("Back.png")?,
        face("Front.png")?,
    ))
}

fn push_environment(
    lights: &mut Vec<Arc<Light>>,
    directory: Option<&Path>,
    intensity: f32,
) -> Result<()> {
    if let Some(directory) = directory {
        let mut environment = load_environment(directory)?;
        environment.intensity = intensity;
        lights.push(Arc::new(Light::from(environment)));
    }
    Ok(())
}

fn showcase_camera() -> Camera {
    let mut camera = Camera::new(512, 512, 1.5, 0.01);
    camera.viewport_mut().set_aspect_ratio(16.0, 9.0);
    camera.xform.set_position(Vector3::new(0.0, 5.0, 20.0));
    camera.look_at(Vector3::new(0.0, 3.0, 0.0), Y_MINUS_AXIS);
    camera
}

/// Three metal spheres over a large ground plane, lit by a point light
/// and, when a cube-map directory is supplied, an environment light.
fn showcase_scene(environment_dir: Option<&Path>) -> Result<Scene> {
    let mut objects: Vec<Arc<Object>> = Vec::new();
    let mut lights: Vec<Arc<Light>> = Vec::new();

    let sphere_positions = [
        Vector3::new(-6.0, 3.0, 0.0),
        Vector3::new(0.0, 3.0, -3.0),
        Vector3::new(6.0, 3.0, 0.0),
    ];
    let sphere_albedos = [
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(0.0, 1.0, 1.0),
    ];
    let sphere_roughness = [0.1, 0.2, 0.1];

    for i in 0..3 {
        let mut sphere = Sphere {
            radius: 3.3,
            ..Sphere::default()
        };
        sphere.xform.set_position(sphere_positions[i]);
        sphere.material.albedo = sphere_albedos[i];
        sphere.material.metalness = 1.0;
        sphere.material.roughness = sphere_roughness[i];
        objects.push(Arc::new(Object::from(sphere)));
    }

    let mut ground = Plane {
        width: 2000.0,
        height: 2000.0,
        ..Plane::default()
    };
    ground.set_direction(Vector3::new(0.0, 1.0, 0.0));
    ground.material.albedo = Vector3::splat(1.0);
    ground.material.roughness = 1.0;
    objects.push(Arc::new(Object::from(ground)));

    let mut key_light = Point::default();
    key_light.intensity = 18.0;
    key_light.color = Vector3::splat(0.9);
    key_light.shadow_intensity = 1.0;
    key_light.xform.set_position(Vector3::new(10.0, 10.0, 10.0));
    lights.push(Arc::new(Light::from(key_light)));

    push_environment(&mut lights, environment_dir, 10.0)?;

    Ok(Scene::new(objects, lights, showcase_camera()))
}

/// 5x5 sphere grid sweeping roughness across columns and metalness
/// across rows, lit from the four corners.
fn pbr_grid_scene(environment_dir: Option<&Path>) -> Result<Scene> {
    let mut objects: Vec<Arc<Object>> = Vec::new();
    let mut lights: Vec<Arc<Light>> = Vec::new();

    let rows = 5usize;
    let columns = 5usize;
    let spacing = 4.0f32;
    for i in 0..rows * columns {
        let c = i / columns;
        let r = i % rows;
        let x = c as f32 * spacing - rows as f32 - spacing;
        let y = r as f32 * spacing - columns as f32 - spacing;

        let metalness = ((1.0 / rows as f32) * r as f32).clamp(0.0, 1.0);
        let roughness = ((1.0 / columns as f32) * c as f32).clamp(0.05, 1.0);

        let mut sphere = Sphere {
            radius: 1.75,
            ..Sphere::default()
        };
        sphere.xform.set_position(Vector3::new(x, y, 0.0));
        sphere.material.albedo = Vector3::new(metalness, 1.0, 1.0);
        sphere.material.metalness = metalness;
        sphere.material.roughness = roughness;
        objects.push(Arc::new(Object::from(sphere)));
    }

    let light_distance = 10.0;
    for (x, y) in [
        (light_distance, light_distance),
        (-light_distance, light_distance),
        (light_distance, -light_distance),
        (-light_distance, -light_distance),
    ] {
        let mut light = Point::default();
        light.intensity = 18.0;
        light.color = Vector3::splat(0.9);
        light.shadow_intensity = 1.0;
        light.xform.set_position(Vector3::new(x, y, light_distance));
        lights.push(Arc::new(Light::from(light)));
    }

    push_environment(&mut lights, environment_dir, 10.0)?;

    Ok(Scene::new(objects, lights, showcase_camera()))
}

/// Fallback height field for the block city when no height-map image is
/// supplied on the command line.
fn ripple_height_map(rows: usize, columns: usize) -> Matrix<f32> {
    let mut map = Matrix::new(rows, columns);
    for r in 0..rows {
        for c in 0..columns {
            let height = ((r as f32 * 0.8).sin() * (c as f32 * 0.6).cos()).abs();
            map.set(r, c, height);
        }
    }
    map
}

/// Grid of metal cubes whose heights come from a height map, under a
/// red key light, a distant red area light, and an optional
/// environment.
fn block_city_scene(
    environment_dir: Option<&Path>,
    height_map: Option<&Path>,
) -> Result<Scene> {
    let mut objects: Vec<Arc<Object>> = Vec::new();
    let mut lights: Vec<Arc<Light>> = Vec::new();

    let mut map = match height_map {
        Some(path) => load_texture(path)?.channels()[0].clone(),
        None => ripple_height_map(8, 8),
    };
    map *= 8.0;
    map += 1.0;

    let grid_width = 20.0f32;
    let grid_height = 20.0f32;
    let rows = map.rows();
    let columns = map.columns();
    for c in 0..columns {
        for r in 0..rows {
            let x = c as f32 * (grid_width / columns as f32) - grid_width;
            let y = map.get(r, c) / 2.0;
            let z = r as f32 * (grid_height / rows as f32) - grid_height;

            let mut cube = Cube {
                width: grid_width / columns as f32 - 0.01,
                height: map.get(r, c),
                length: grid_height / rows as f32 - 0.01,
                ..Cube::default()
            };
            cube.xform.set_position(Vector3::new(x, y, z));
            cube.material.albedo = Vector3::new(0.988235, 0.980392, 0.960784);
            cube.material.metalness = 1.0;
            cube.material.roughness = 0.6;
            objects.push(Arc::new(Object::from(cube)));
        }
    }

    let mut key_light = Point::default();
    key_light.intensity = 28.0;
    key_light.color = Vector3::new(0.9, 0.1, 0.1);
    key_light.shadow_intensity = 1.0;
    key_light.xform.set_position(Vector3::new(20.0, 20.0, 20.0));
    lights.push(Arc::new(Light::from(key_light)));

    let mut fill_light = Area::default();
    fill_light.intensity = 18.0;
    fill_light.color = Vector3::new(0.9, 0.1, 0.1);
    fill_light.shadow_intensity = 1.0;
    fill_light.grid.width = 10.0;
    fill_light.grid.height = 10.0;
    fill_light.grid.xform.set_position(Vector3::new(0.0, 0.0, -50.0));
    fill_light.grid.set_direction(Vector3::new(0.0, 0.0, 1.0));
    lights.push(Arc::new(Light::from(fill_light)));

    push_environment(&mut lights, environment_dir, 2.0)?;

    let mut camera = Camera::new(512, 512, 4.0, 0.01);
    camera.xform.set_position(Vector3::new(-28.0, 15.0, -28.0));
    camera.look_at(Vector3::new(-5.0, 0.0, -5.0), Y_MINUS_AXIS);

    Ok(Scene::new(objects, lights, camera))
}

fn main() -> Result<()> {
    lumen::logger::init(LevelFilter::Info)?;

    let mut args = std::env::args().skip(1);
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_owned()));
    let environment_dir = args.next().map(PathBuf::from);
    let height_map = args.next().map(PathBuf::from);

    let environment_dir = environment_dir.as_deref();
    let scenes = [
        ("render_showcase.png", showcase_scene(environment_dir)?),
        ("render_pbr_grid.png", pbr_grid_scene(environment_dir)?),
        (
            "render_block_city.png",
            block_city_scene(environment_dir, height_map.as_deref())?,
        ),
    ];

    for (name, scene) in &scenes {
        let output = output_dir.join(name).to_string_lossy().into_owned();
        log::info!("rendering to {output}");
        let tracer = RayTracer::new(scene, Settings::default());
        let pixels = tracer.render(save_image, &output);
        save_image(&pixels, &output);
    }
    log::logger().flush();

    Ok(())
}
