use std::ops::{Add, Mul, Sub};

/// Dense row-major `f64` matrix. A row vector is a `1 x n` matrix.
///
/// The arithmetic operators panic on incompatible shapes; callers that take
/// untrusted shapes check them first and report a `NetError::Dimension`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from nested rows. All rows must have the same length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let cols = data.first().map_or(0, |row| row.len());
        assert!(
            data.iter().all(|row| row.len() == cols),
            "Matrix rows must all have the same length"
        );
        Matrix {
            rows: data.len(),
            cols,
            data,
        }
    }

    /// Builds a `1 x n` row vector.
    pub fn row(values: Vec<f64>) -> Matrix {
        Matrix {
            rows: 1,
            cols: values.len(),
            data: vec![values],
        }
    }

    /// Builds a matrix whose entries are produced by `f(row, col)`.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Matrix
    where
        F: FnMut(usize, usize) -> f64,
    {
        let data = (0..rows)
            .map(|i| (0..cols).map(|j| f(i, j)).collect())
            .collect();
        Matrix { rows, cols, data }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_row(&self) -> bool {
        self.rows == 1
    }

    /// Values of the first row. Meant for row vectors.
    pub fn row_values(&self) -> &[f64] {
        self.data.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn into_row_values(self) -> Vec<f64> {
        self.data.into_iter().next().unwrap_or_default()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn transpose(&self) -> Matrix {
        Matrix::from_fn(self.cols, self.rows, |i, j| self.data[j][i])
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.shape(), other.shape(), "Matrices are of incorrect sizes");
        Matrix::from_fn(self.rows, self.cols, |i, j| self.data[i][j] * other.data[i][j])
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().flatten().sum()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl<'a> Add<&'a Matrix> for &'a Matrix {
    type Output = Matrix;

    fn add(self, rhs: &Matrix) -> Matrix {
        if self.shape() != rhs.shape() {
            panic!("Matrices are of incorrect sizes")
        }
        Matrix::from_fn(self.rows, self.cols, |i, j| self.data[i][j] + rhs.data[i][j])
    }
}

impl<'a> Sub<&'a Matrix> for &'a Matrix {
    type Output = Matrix;

    fn sub(self, rhs: &Matrix) -> Matrix {
        if self.shape() != rhs.shape() {
            panic!("Matrices are of incorrect sizes")
        }
        Matrix::from_fn(self.rows, self.cols, |i, j| self.data[i][j] - rhs.data[i][j])
    }
}

impl<'a> Mul<&'a Matrix> for &'a Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.data[i][k];
                for j in 0..rhs.cols {
                    res.data[i][j] += a * rhs.data[k][j];
                }
            }
        }
        res
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Matrix {
        &self + &rhs
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Matrix {
        &self - &rhs
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Matrix {
        &self * &rhs
    }
}
