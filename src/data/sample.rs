use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;

/// One labeled image: a `height x width` grid of byte intensities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    height: usize,
    width: usize,
    pixels: Vec<Vec<u8>>,
    label: u8,
}

impl Sample {
    /// Panics if `pixels` is not `height` rows of `width` bytes; the IDX
    /// reader only builds grids of the declared shape.
    pub(crate) fn new(height: usize, width: usize, pixels: Vec<Vec<u8>>, label: u8) -> Sample {
        assert_eq!(pixels.len(), height, "pixel grid must have `height` rows");
        assert!(pixels.iter().all(|row| row.len() == width), "pixel rows must have `width` bytes");
        Sample { height, width, pixels, label }
    }

    pub fn label(&self) -> u8 {
        self.label
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Pixel rows, top to bottom.
    pub fn pixels(&self) -> &[Vec<u8>] {
        &self.pixels
    }

    pub fn pixel(&self, row: usize, col: usize) -> u8 {
        self.pixels[row][col]
    }

    /// Row-major `1 x (height * width)` vector of the raw byte values.
    pub fn to_vector(&self) -> Matrix {
        Matrix::row(self.pixels.iter().flatten().map(|&p| p as f64).collect())
    }

    /// Same as [`Sample::to_vector`] with every pixel divided by 255.
    pub fn to_normalized_vector(&self) -> Matrix {
        Matrix::row(self.pixels.iter().flatten().map(|&p| p as f64 / 255.0).collect())
    }

    /// `height x width` matrix of the raw byte values.
    pub fn to_matrix(&self) -> Matrix {
        Matrix::from_fn(self.height, self.width, |r, c| self.pixels[r][c] as f64)
    }

    /// `1 x n_classes` teacher vector with a 1 at the label's index.
    pub fn one_hot(&self, n_classes: usize) -> Result<Matrix> {
        let class = self.label as usize;
        if class >= n_classes {
            return Err(NetError::dimension("one-hot label", (1, n_classes), (1, class + 1)));
        }
        let mut one_hot = vec![0.0; n_classes];
        one_hot[class] = 1.0;
        Ok(Matrix::row(one_hot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Sample {
        Sample::new(2, 3, vec![vec![0, 1, 2], vec![255, 128, 3]], 7)
    }

    #[test]
    fn vector_is_row_major() {
        let v = sample().to_vector();
        assert_eq!(v.shape(), (1, 6));
        assert_eq!(v.row_values(), &[0.0, 1.0, 2.0, 255.0, 128.0, 3.0]);
    }

    #[test]
    fn normalized_vector_is_in_unit_range() {
        let v = sample().to_normalized_vector();
        assert_eq!(v.get(0, 3), 1.0);
        assert!(v.row_values().iter().all(|&x| (0.0..=1.0).contains(&x)));
    }

    #[test]
    fn matrix_keeps_grid_shape() {
        let m = sample().to_matrix();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(1, 1), 128.0);
    }

    #[test]
    fn one_hot_encodes_label() {
        let t = sample().one_hot(10).unwrap();
        assert_eq!(t.shape(), (1, 10));
        assert_eq!(t.get(0, 7), 1.0);
        assert_eq!(t.sum(), 1.0);
        assert!(matches!(sample().one_hot(7), Err(NetError::Dimension { .. })));
    }
}
