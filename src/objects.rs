use crate::shader::Shader;
use crate::transform::{Ray, Transform};
use crate::vector::{Vector3, Y_AXIS};

fn near_value(a: f32, b: f32) -> bool {
    (a.abs() - b.abs()).abs() <= 1e-4
}

/// Result of an object or scene intersection. `object` is the index of
/// the hit object in the scene's object list; object-level intersections
/// leave it unset and the scene dispatcher fills it in.
#[derive(Debug, Clone, Default)]
pub struct Intersection {
    pub hit: bool,
    pub position: Vector3,
    pub surface_color: Vector3,
    pub object: Option<usize>,
}

/// Finite rectangle oriented by its transform's +Y axis, sized by
/// `width` x `height` in local space.
#[derive(Debug, Clone)]
pub struct Plane {
    pub width: f32,
    pub height: f32,
    pub xform: Transform,
    pub material: Shader,
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 10.0,
            xform: Transform::default(),
            material: Shader::default(),
        }
    }
}

impl Plane {
    pub fn new(width: f32, height: f32, position: Vector3, direction: Vector3) -> Self {
        let mut plane = Self {
            width,
            height,
            ..Self::default()
        };
        plane.xform.set_position(position);
        plane.set_direction(direction);
        plane
    }

    /// The plane normal: the second basis column of the transform.
    pub fn normal(&self) -> Vector3 {
        let axis = self.xform.axis();
        Vector3::new(axis.get(0, 1), axis.get(1, 1), axis.get(2, 1))
    }

    /// Reorients the plane so its +Y axis points along `direction`.
    pub fn set_direction(&mut self, direction: Vector3) {
        let normalized = direction.normalized();
        let difference = normalized.dot(&Y_AXIS);
        if difference == 1.0 {
            return;
        }
        if difference == -1.0 {
            let mut flipped = self.xform.axis().clone();
            flipped *= -1.0;
            self.xform.set_axis(flipped, false);
            return;
        }
        self.xform = Transform::new(normalized, Y_AXIS, self.xform.position());
    }

    /// Maps plane UVs to a world position, optionally lifted off the
    /// surface along local +Y by `surface_offset`.
    pub fn uv_to_world(&self, u: f32, v: f32, surface_offset: f32) -> Vector3 {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        let local = Vector3::new(
            self.width * u - half_width,
            surface_offset,
            self.height * v - half_height,
        );
        local.matrix_multiply(self.xform.axis()) + self.xform.position()
    }

    pub fn world_to_uv(&self, position: Vector3) -> Vector3 {
        let half = Vector3::new(self.width / 2.0, 0.0, self.height / 2.0);
        let local =
            (position - self.xform.position()).matrix_multiply(self.xform.inverse()) - half;
        Vector3::new(
            (local[0] / self.width).abs(),
            (local[2] / self.height).abs(),
            0.0,
        )
    }

    pub fn intersect(&self, ray: &Ray) -> Intersection {
        let normal = self.normal();
        let denominator = ray.direction().dot(&normal);
        if denominator.abs() <= 0.0 {
            return Intersection::default();
        }

        let to_center = self.xform.position() - ray.origin();
        let surface_distance = to_center.dot(&normal) / denominator;
        if surface_distance < 0.0 {
            return Intersection::default();
        }

        let position = ray.origin() + ray.direction() * surface_distance;
        let local =
            (position - self.xform.position()).matrix_multiply(self.xform.inverse());

        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        if local[0].abs() < half_width && local[2].abs() < half_height {
            return Intersection {
                hit: true,
                position,
                surface_color: self.material.albedo,
                object: None,
            };
        }

        Intersection::default()
    }

    pub fn normal_at(&self, _hit: Vector3) -> Vector3 {
        self.normal()
    }
}

#[derive(Debug, Clone)]
pub struct Sphere {
    pub radius: f32,
    pub xform: Transform,
    pub material: Shader,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            radius: 1.0,
            xform: Transform::default(),
            material: Shader::default(),
        }
    }
}

impl Sphere {
    pub fn intersect(&self, ray: &Ray) -> Intersection {
        let center = self.xform.position();
        let to_sphere = center - ray.origin();
        let sign = to_sphere.dot(&ray.direction());

        if sign < 0.0 {
            if to_sphere.length() > self.radius {
                return Intersection::default();
            }
            if to_sphere.length() == self.radius {
                return Intersection {
                    hit: true,
                    position: ray.origin(),
                    surface_color: self.material.albedo,
                    object: None,
                };
            }
        }

        let projection = ray.project(center);
        if (center - projection).length() > self.radius {
            return Intersection::default();
        }

        let half_chord = ((self.radius * self.radius)
            - (projection - center).length().powi(2))
        .sqrt();

        let mut offset = (projection - ray.origin()).length();
        if to_sphere.length() > self.radius {
            offset -= half_chord;
        } else {
            offset += half_chord;
        }

        Intersection {
            hit: true,
            position: ray.origin() + ray.direction() * offset,
            surface_color: self.material.albedo,
            object: None,
        }
    }

    pub fn normal_at(&self, hit: Vector3) -> Vector3 {
        (hit - self.xform.position()).normalized()
    }
}

/// Axis-aligned box. The transform's rotation is deliberately ignored by
/// the slab intersection; only the position is honored.
#[derive(Debug, Clone)]
pub struct Cube {
    pub width: f32,
    pub height: f32,
    pub length: f32,
    pub xform: Transform,
    pub material: Shader,
}

impl Default for Cube {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            length: 1.0,
            xform: Transform::default(),
            material: Shader::default(),
        }
    }
}

impl Cube {
    fn half_extents(&self) -> Vector3 {
        Vector3::new(self.width / 2.0, self.height / 2.0, self.length / 2.0)
    }

    pub fn intersect(&self, ray: &Ray) -> Intersection {
        let half = self.half_extents();
        let min = self.xform.position() - half;
        let max = self.xform.position() + half;

        let origin = ray.origin();
        let direction = ray.direction();

        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;
        for axis in 0..3 {
            let t1 = (min[axis] - origin[axis]) / direction[axis];
            let t2 = (max[axis] - origin[axis]) / direction[axis];
            tmin = tmin.max(t1.min(t2));
            tmax = tmax.min(t1.max(t2));
        }

        if tmax < 0.0 || tmin < 0.0 || tmin > tmax {
            return Intersection::default();
        }

        Intersection {
            hit: true,
            position: origin + direction * tmin,
            surface_color: self.material.albedo,
            object: None,
        }
    }

    pub fn normal_at(&self, hit: Vector3) -> Vector3 {
        let local = hit - self.xform.position();
        let half = self.half_extents();

        for (axis, unit) in [
            (0, Vector3::new(1.0, 0.0, 0.0)),
            (1, Vector3::new(0.0, 1.0, 0.0)),
            (2, Vector3::new(0.0, 0.0, 1.0)),
        ] {
            if near_value(local[axis], half[axis]) {
                return if local[axis] < 0.0 { unit * -1.0 } else { unit };
            }
        }

        local.normalized()
    }
}

/// Scene primitive. A closed set, so a tagged variant rather than trait
/// objects.
#[derive(Debug, Clone)]
pub enum Object {
    Plane(Plane),
    Sphere(Sphere),
    Cube(Cube),
}

impl Object {
    pub fn intersect(&self, ray: &Ray) -> Intersection {
        match self {
            Object::Plane(plane) => plane.intersect(ray),
            Object::Sphere(sphere) => sphere.intersect(ray),
            Object::Cube(cube) => cube.intersect(ray),
        }
    }

    pub fn normal_at(&self, hit: Vector3) -> Vector3 {
        match self {
            Object::Plane(plane) => plane.normal_at(hit),
            Object::Sphere(sphere) => sphere.normal_at(hit),
            Object::Cube(cube) => cube.normal_at(hit),
        }
    }

    pub fn material(&self) -> &Shader {
        match self {
            Object::Plane(plane) => &plane.material,
            Object::Sphere(sphere) => &sphere.material,
            Object::Cube(cube) => &cube.material,
        }
    }

    pub fn xform(&self) -> &Transform {
        match self {
            Object::Plane(plane) => &plane.xform,
            Object::Sphere(sphere) => &sphere.xform,
            Object::Cube(cube) => &cube.xform,
        }
    }
}

impl From<Plane> for Object {
    fn from(plane: Plane) -> Self {
        Object::Plane(plane)
    }
}

impl From<Sphere> for Object {
    fn from(sphere: Sphere) -> Self {
        Object::Sphere(sphere)
    }
}

impl From<Cube> for Object {
    fn from(cube: Cube) -> Self {
        Object::Cube(cube)
    }
}
