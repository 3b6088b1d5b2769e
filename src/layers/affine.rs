//! Backward rules of the affine transform `x = a · W + B`.

use crate::math::matrix::Matrix;

/// ∂L/∂a = upstream · Wᵀ
pub fn grad_input(weights: &Matrix, upstream: &Matrix) -> Matrix {
    upstream * &weights.transpose()
}

/// ∂L/∂W = aᵀ · upstream
pub fn grad_weights(input: &Matrix, upstream: &Matrix) -> Matrix {
    &input.transpose() * upstream
}

/// ∂L/∂B = upstream, since the bias is added unchanged.
pub fn grad_biases(upstream: &Matrix) -> Matrix {
    upstream.clone()
}
