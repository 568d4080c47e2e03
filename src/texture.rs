use thiserror::Error;

use crate::matrix::Matrix;
use crate::vector::Vector3;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("channel dimensions differ: expected {expected_rows}x{expected_columns}, got {rows}x{columns}")]
    MismatchedChannels {
        expected_rows: usize,
        expected_columns: usize,
        rows: usize,
        columns: usize,
    },
}

/// Four-channel float image (R, G, B, A), each channel its own matrix.
/// Values are expected in `[0, 1]`.
#[derive(Debug, Clone, Default)]
pub struct Texture {
    channels: [Matrix<f32>; 4],
}

impl Texture {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            channels: std::array::from_fn(|_| Matrix::new(height, width)),
        }
    }

    pub fn from_channels(channels: [Matrix<f32>; 4]) -> Result<Self, TextureError> {
        let rows = channels[0].rows();
        let columns = channels[0].columns();
        for channel in &channels[1..] {
            if channel.rows() != rows || channel.columns() != columns {
                return Err(TextureError::MismatchedChannels {
                    expected_rows: rows,
                    expected_columns: columns,
                    rows: channel.rows(),
                    columns: channel.columns(),
                });
            }
        }
        Ok(Self { channels })
    }

    pub fn width(&self) -> usize {
        self.channels[0].columns()
    }

    pub fn height(&self) -> usize {
        self.channels[0].rows()
    }

    pub fn channels(&self) -> &[Matrix<f32>; 4] {
        &self.channels
    }

    fn texel(&self, u: f32, v: f32) -> (usize, usize) {
        let rows = self.channels[0].rows();
        let columns = self.channels[0].columns();
        let row = ((v * rows as f32) as usize).min(rows.saturating_sub(1));
        let column = ((u * columns as f32) as usize).min(columns.saturating_sub(1));
        (row, column)
    }

    /// Nearest-texel RGB lookup.
    pub fn sample(&self, u: f32, v: f32) -> Vector3 {
        let (row, column) = self.texel(u, v);
        Vector3::new(
            self.channels[0].get(row, column),
            self.channels[1].get(row, column),
            self.channels[2].get(row, column),
        )
    }

    pub fn set_pixel(&mut self, u: f32, v: f32, rgb: Vector3) {
        let (row, column) = self.texel(u, v);
        self.channels[0].set(row, column, rgb[0]);
        self.channels[1].set(row, column, rgb[1]);
        self.channels[2].set(row, column, rgb[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_reads_back_set_pixel() {
        let mut texture = Texture::new(4, 4);
        texture.set_pixel(0.6, 0.1, Vector3::new(0.2, 0.4, 0.8));
        assert_eq!(texture.sample(0.6, 0.1), Vector3::new(0.2, 0.4, 0.8));
        assert_eq!(texture.sample(0.0, 0.0), Vector3::default());
    }

    #[test]
    fn uv_one_clamps_to_last_texel() {
        let mut texture = Texture::new(2, 2);
        texture.set_pixel(1.0, 1.0, Vector3::splat(0.5));
        assert_eq!(texture.sample(0.99, 0.99), Vector3::splat(0.5));
    }

    #[test]
    fn mismatched_channels_are_rejected() {
        let channels = [
            Matrix::new(2, 2),
            Matrix::new(2, 2),
            Matrix::new(2, 3),
            Matrix::new(2, 2),
        ];
        assert!(Texture::from_channels(channels).is_err());
    }
}
