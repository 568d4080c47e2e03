use crate::sampling;
use crate::transform::{Ray, Transform};
use crate::vector::Vector3;
use crate::viewport::Viewport;

/// Pinhole camera: a transform, a focal length, and the viewport it
/// projects onto.
pub struct Camera {
    pub focal_length: f32,
    pub xform: Transform,
    viewport: Viewport,
}

impl Camera {
    pub const DEFAULT_JITTER: f32 = 0.01;

    pub fn new(width: usize, height: usize, focal_length: f32, pixel_spacing: f32) -> Self {
        Self {
            focal_length,
            xform: Transform::default(),
            viewport: Viewport::new(width, height, pixel_spacing),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Orients the camera toward `target`.
    pub fn look_at(&mut self, target: Vector3, up: Vector3) {
        let direction = self.xform.position() - target;
        let axis = Transform::new(direction, up, self.xform.position());
        self.xform.set_axis(axis.axis().clone(), false);
    }

    /// Primary ray through the given pixel, jittered inside the pixel
    /// footprint for stochastic antialiasing.
    pub fn create_ray(&self, pixel: usize, jitter: f32) -> Ray {
        let uv = self.viewport.pixel_uv(pixel);
        let grid = self.viewport.pixel_position(uv[0], uv[1]);

        // The viewport plane sits along local -Y at the focal distance.
        let local = Vector3::new(grid[0], -self.focal_length, grid[1]);
        let world = local.matrix_multiply(self.xform.axis()) + self.xform.position();

        let r1 = sampling::random() - 0.5;
        let r2 = sampling::random() - 0.5;
        let r3 = sampling::random() - 0.5;

        let direction = world - self.xform.position()
            + Vector3::new(r1 * jitter, r2 * jitter, r3 * jitter);
        Ray::new(self.xform.position(), direction)
    }
}
