use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::math::shape::expect_matching_rows;

/// Categorical cross-entropy, usually paired with a Softmax output layer.
///
/// Components whose expected value is exactly 0 contribute nothing to either
/// the loss or the gradient (0 · ln 0 is taken as 0), so a predicted
/// probability of 0 on a non-target class stays finite.
pub struct CrossEntropyLoss;

impl CrossEntropyLoss {
    /// L = -sum(expected[i] * ln(predicted[i]))
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
        expect_matching_rows("cross entropy", predicted, expected)?;
        Ok(predicted
            .row_values()
            .iter()
            .zip(expected.row_values())
            .filter(|(_, t)| **t != 0.0)
            .map(|(p, t)| -t * p.ln())
            .sum())
    }

    /// ∂L/∂predicted[i] = -expected[i] / predicted[i]
    ///
    /// This is the gradient with respect to the probabilities; the Softmax
    /// layer's own Jacobian is applied afterwards by the network.
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Result<Matrix> {
        expect_matching_rows("cross entropy backward", predicted, expected)?;
        let grad = predicted
            .row_values()
            .iter()
            .zip(expected.row_values())
            .map(|(p, &t)| if t == 0.0 { 0.0 } else { -t / p })
            .collect();
        Ok(Matrix::row(grad))
    }
}
