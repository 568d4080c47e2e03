use parking_lot::RwLock;

use crate::matrix::Matrix;
use crate::vector::{Vector2, Vector3};

/// Snapshot of the three channel buffers, in R, G, B order.
pub type Pixels = [Matrix<f32>; 3];

/// Pixel grid backed by one matrix per color channel. Workers write
/// disjoint cells concurrently while the progress reader copies whatever
/// state is current, so the channels sit behind a coarse lock and
/// readers get a snapshot rather than a reference.
pub struct Viewport {
    pixels_x: usize,
    pixels_y: usize,
    pixel_spacing: f32,
    pixels: RwLock<Pixels>,
}

impl Viewport {
    pub fn new(pixels_x: usize, pixels_y: usize, pixel_spacing: f32) -> Self {
        Self {
            pixels_x,
            pixels_y,
            pixel_spacing,
            pixels: RwLock::new(std::array::from_fn(|_| Matrix::new(pixels_y, pixels_x))),
        }
    }

    /// Shrinks the horizontal resolution by `a / b`. Surprising for
    /// callers expecting "width from height times ratio", but kept for
    /// compatibility with existing scene setups.
    pub fn set_aspect_ratio(&mut self, a: f32, b: f32) {
        let ratio = a / b;
        self.pixels_x = (self.pixels_x as f32 / ratio) as usize;
        self.pixels = RwLock::new(std::array::from_fn(|_| {
            Matrix::new(self.pixels_y, self.pixels_x)
        }));
    }

    pub fn pixels_x(&self) -> usize {
        self.pixels_x
    }

    pub fn pixels_y(&self) -> usize {
        self.pixels_y
    }

    pub fn area(&self) -> usize {
        self.pixels_x * self.pixels_y
    }

    pub fn set_pixel(&self, index: usize, r: f32, g: f32, b: f32) {
        let mut pixels = self.pixels.write();
        pixels[0][index] = r;
        pixels[1][index] = g;
        pixels[2][index] = b;
    }

    pub fn pixel_value(&self, index: usize) -> Vector3 {
        let pixels = self.pixels.read();
        Vector3::new(pixels[0][index], pixels[1][index], pixels[2][index])
    }

    /// Copies the current channel state. Mid-render this may mix pixels
    /// from different moments, which is fine for progressive previews.
    pub fn pixels(&self) -> Pixels {
        self.pixels.read().clone()
    }

    pub fn pixel_uv(&self, index: usize) -> Vector2 {
        let column = (index % self.pixels_x) as f32;
        let row = (index / self.pixels_x) as f32;
        Vector2::new(column / self.pixels_x as f32, row / self.pixels_y as f32)
    }

    /// World-plane position of a UV coordinate, on the viewport's local
    /// XY plane.
    pub fn pixel_position(&self, u: f32, v: f32) -> Vector3 {
        let half_width = self.pixels_x as f32 / 2.0;
        let half_height = self.pixels_y as f32 / 2.0;

        let x = (self.pixels_x as f32 * u - half_width) * self.pixel_spacing;
        let y = (self.pixels_y as f32 * v - half_height) * self.pixel_spacing;
        Vector3::new(x, y, 0.0)
    }
}
