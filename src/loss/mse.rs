use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::math::shape::expect_matching_rows;

pub struct MseLoss;

impl MseLoss {
    /// Scalar loss: sum((predicted - expected)²) / 2
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
        expect_matching_rows("mean squared error", predicted, expected)?;
        Ok(predicted
            .row_values()
            .iter()
            .zip(expected.row_values())
            .map(|(p, t)| (p - t) * (p - t) / 2.0)
            .sum())
    }

    /// Per-output gradient: predicted - expected
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Result<Matrix> {
        expect_matching_rows("mean squared error backward", predicted, expected)?;
        Ok(predicted - expected)
    }
}
