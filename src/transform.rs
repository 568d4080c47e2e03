use crate::matrix::Matrix;
use crate::vector::Vector3;

/// Oriented frame: a 3x3 rotation basis, a position, and the cached
/// inverse of the basis. The basis columns are `[y, z, x]` where `z` is
/// the frame's forward direction.
#[derive(Debug, Clone)]
pub struct Transform {
    axis: Matrix<f32>,
    inverse: Matrix<f32>,
    position: Vector3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            axis: Matrix::identity(3),
            inverse: Matrix::identity(3),
            position: Vector3::default(),
        }
    }
}

impl Transform {
    pub fn new(forward: Vector3, up: Vector3, position: Vector3) -> Self {
        let mut transform = Self {
            axis: Matrix::identity(3),
            inverse: Matrix::identity(3),
            position,
        };

        let difference = forward.normalized().dot(&up.normalized());
        if difference.abs() >= 1.0 - 1e-6 {
            log::warn!("forward and up are parallel when creating axis, falling back to identity");
            return transform;
        }

        let z = forward.normalized();
        let y = z.cross(&up).normalized();
        let x = z.cross(&y).normalized();
        for i in 0..3 {
            transform.axis.set(i, 0, y[i]);
            transform.axis.set(i, 1, z[i]);
            transform.axis.set(i, 2, x[i]);
        }
        transform.inverse = transform.axis.inversed();
        transform
    }

    pub fn axis(&self) -> &Matrix<f32> {
        &self.axis
    }

    pub fn inverse(&self) -> &Matrix<f32> {
        &self.inverse
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    /// Replaces the basis. `skip_inverse` defers the inverse computation
    /// for callers that are about to overwrite the basis again; the
    /// cached inverse is stale until a final call recomputes it.
    pub fn set_axis(&mut self, axis: Matrix<f32>, skip_inverse: bool) {
        assert!(
            axis.rows() == 3 && axis.columns() == 3,
            "transform basis must be 3x3"
        );
        self.axis = axis;
        if !skip_inverse {
            self.inverse = self.axis.inversed();
        }
    }
}

/// Ray with an origin and a unit direction. The direction is normalized
/// at construction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    origin: Vector3,
    direction: Vector3,
}

impl Ray {
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: direction.normalized(),
        }
    }

    pub fn origin(&self) -> Vector3 {
        self.origin
    }

    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    /// Orthogonal projection of `position` onto the ray's line.
    pub fn project(&self, position: Vector3) -> Vector3 {
        let distance = (position - self.origin).dot(&self.direction);
        self.origin + self.direction * distance
    }

    /// Mirror reflection of `direction` about `normal`.
    pub fn reflect(normal: Vector3, direction: Vector3) -> Vector3 {
        normal * (2.0 * normal.dot(&direction)) - direction
    }
}
