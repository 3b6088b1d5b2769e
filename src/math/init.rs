use rand::Rng;
use std::f64::consts::PI;

use crate::math::matrix::Matrix;

/// Samples a single value from N(0, 1) using the Box-Muller transform.
pub fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // `gen` is uniform on [0, 1); flip it to (0, 1] so ln(u1) stays finite.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Samples from N(mean, std_dev).
pub fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    mean + std_dev * sample_standard_normal(rng)
}

/// He initialization: every entry drawn independently from N(0, sqrt(2 / rows)).
///
/// Shape: (rows, cols). `rows` is the fan-in, since layers multiply a
/// `1 x rows` activation by this matrix.
pub fn he<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
    let std_dev = (2.0 / rows as f64).sqrt();
    Matrix::from_fn(rows, cols, |_, _| sample_normal(&mut *rng, 0.0, std_dev))
}
