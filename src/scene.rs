use std::sync::Arc;

use crate::camera::Camera;
use crate::lights::Light;
use crate::objects::{Intersection, Object};
use crate::transform::Ray;

/// Insertion-ordered objects and lights plus the camera. Everything is
/// read-only once construction finishes, so the graph can be shared
/// freely across render workers.
pub struct Scene {
    pub objects: Vec<Arc<Object>>,
    pub lights: Vec<Arc<Light>>,
    pub camera: Camera,
}

impl Scene {
    pub fn new(objects: Vec<Arc<Object>>, lights: Vec<Arc<Light>>, camera: Camera) -> Self {
        let mut scene = Self {
            objects,
            lights,
            camera,
        };
        scene.initialize();
        scene
    }

    /// Injects the grid planes of area lights that want their geometry
    /// rendered, so the lights themselves are visible to primary rays.
    pub fn initialize(&mut self) {
        for light in &self.lights {
            if let Light::Area(area) = light.as_ref() {
                if area.render_geometry {
                    self.objects.push(Arc::new(Object::Plane(area.grid.clone())));
                }
            }
        }
    }
}

/// Intersects every object in insertion order. With `all` set, returns
/// every hit while keeping the closest one at the front; otherwise
/// returns on the first hit found. Ties keep the earlier object (strict
/// less-than on distance).
pub fn intersect_scene(objects: &[Arc<Object>], ray: &Ray, all: bool) -> Vec<Intersection> {
    let mut intersections = Vec::new();
    let mut closest = f32::INFINITY;

    for (index, object) in objects.iter().enumerate() {
        let mut intersection = object.intersect(ray);
        if !intersection.hit {
            continue;
        }
        intersection.object = Some(index);

        if !all {
            return vec![intersection];
        }

        intersections.push(intersection);
        let last = intersections.len() - 1;
        let distance = ray.origin().distance(&intersections[last].position);
        if distance < closest {
            closest = distance;
            intersections.swap(0, last);
        }
    }

    intersections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Sphere;
    use crate::vector::{Vector3, Z_MINUS_AXIS};

    fn sphere_at(z: f32) -> Arc<Object> {
        let mut sphere = Sphere::default();
        sphere.xform.set_position(Vector3::new(0.0, 0.0, z));
        Arc::new(Object::from(sphere))
    }

    #[test]
    fn closest_hit_is_kept_at_the_front() {
        // Insertion order deliberately differs from depth order.
        let objects = vec![sphere_at(-4.0), sphere_at(0.0), sphere_at(-8.0)];
        let ray = Ray::new(Vector3::new(0.0, 0.0, 5.0), Z_MINUS_AXIS);

        let intersections = intersect_scene(&objects, &ray, true);
        assert_eq!(intersections.len(), 3);
        assert_eq!(intersections[0].object, Some(1));

        let front = ray.origin().distance(&intersections[0].position);
        for intersection in &intersections[1..] {
            assert!(front <= ray.origin().distance(&intersection.position));
        }
    }

    #[test]
    fn first_hit_mode_returns_one_entry() {
        let objects = vec![sphere_at(-4.0), sphere_at(0.0)];
        let ray = Ray::new(Vector3::new(0.0, 0.0, 5.0), Z_MINUS_AXIS);
        let intersections = intersect_scene(&objects, &ray, false);
        assert_eq!(intersections.len(), 1);
        assert_eq!(intersections[0].object, Some(0));
    }

    #[test]
    fn empty_scene_never_hits() {
        let ray = Ray::new(Vector3::default(), Z_MINUS_AXIS);
        assert!(intersect_scene(&[], &ray, true).is_empty());
    }

    #[test]
    fn area_light_geometry_is_injected() {
        use crate::camera::Camera;
        use crate::lights::{Area, Light};

        let mut area = Area::new(2.0, 2.0, 4);
        area.render_geometry = true;
        let scene = Scene::new(
            Vec::new(),
            vec![Arc::new(Light::from(area))],
            Camera::new(4, 4, 1.0, 0.1),
        );
        assert_eq!(scene.objects.len(), 1);
        assert!(matches!(scene.objects[0].as_ref(), Object::Plane(_)));
    }
}
