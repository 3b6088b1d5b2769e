use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::math::shape::{expect_matching_rows, expect_row};

/// Activation applied after each affine transform.
///
/// Every variant works on `1 x n` row vectors. `forward` maps the
/// pre-activation to the activation; `backward` takes the pre-activation and
/// the upstream gradient ∂L/∂a and returns ∂L/∂x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationFunction {
    Identity,
    ReLU,
    Sigmoid,
    /// Vector-valued: every output depends on every input, so the backward
    /// rule goes through the full Jacobian.
    Softmax,
}

impl ActivationFunction {
    pub fn forward(&self, x: &Matrix) -> Result<Matrix> {
        expect_row("activation forward", x)?;
        Ok(match self {
            ActivationFunction::Identity => x.clone(),
            ActivationFunction::ReLU => x.map(relu),
            ActivationFunction::Sigmoid => x.map(sigmoid),
            ActivationFunction::Softmax => Matrix::row(softmax(x.row_values())),
        })
    }

    pub fn backward(&self, pre_activation: &Matrix, upstream: &Matrix) -> Result<Matrix> {
        expect_matching_rows("activation backward", pre_activation, upstream)?;
        Ok(match self {
            ActivationFunction::Identity => upstream.clone(),
            ActivationFunction::ReLU => upstream.hadamard(&pre_activation.map(relu_derivative)),
            ActivationFunction::Sigmoid => {
                upstream.hadamard(&pre_activation.map(sigmoid_derivative))
            }
            ActivationFunction::Softmax => upstream * &softmax_jacobian(pre_activation.row_values()),
        })
    }
}

fn relu(x: f64) -> f64 {
    if x > 0.0 { x } else { 0.0 }
}

// Strictly positive inputs pass the gradient; the kink at 0 gets 0.
fn relu_derivative(x: f64) -> f64 {
    if x > 0.0 { 1.0 } else { 0.0 }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn sigmoid_derivative(x: f64) -> f64 {
    let fx = sigmoid(x);
    fx * (1.0 - fx)
}

/// Exponentials shifted by the maximum input, so the largest term is e^0 = 1.
fn shifted_exp(x: &[f64]) -> Vec<f64> {
    let c = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    x.iter().map(|&v| (v - c).exp()).collect()
}

/// softmax_i = e^{x_i - c} / sum_k e^{x_k - c}, c = max(x).
pub fn softmax(x: &[f64]) -> Vec<f64> {
    let exp = shifted_exp(x);
    let sum: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / sum).collect()
}

/// J[i][j] = (δ_ij e^{x_i} - softmax_i e^{x_j}) / sum_k e^{x_k}.
///
/// Evaluated with the max-shifted exponentials from `softmax`: the shift
/// cancels in every ratio, and large inputs no longer overflow.
fn softmax_jacobian(x: &[f64]) -> Matrix {
    let exp = shifted_exp(x);
    let sum: f64 = exp.iter().sum();
    let out: Vec<f64> = exp.iter().map(|e| e / sum).collect();

    Matrix::from_fn(x.len(), x.len(), |i, j| {
        let delta = if i == j { exp[i] } else { 0.0 };
        (delta - out[i] * exp[j]) / sum
    })
}
