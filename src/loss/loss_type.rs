use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;

/// Selects which loss function the network trains against.
///
/// - `Mse`: sum of squared errors halved; pair with Identity or Sigmoid output.
/// - `CrossEntropy`: categorical cross-entropy; pair with Softmax output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Mse,
    CrossEntropy,
}

impl LossType {
    /// Scalar loss between a prediction and its teacher vector.
    pub fn loss(&self, predicted: &Matrix, expected: &Matrix) -> Result<f64> {
        match self {
            LossType::Mse => MseLoss::loss(predicted, expected),
            LossType::CrossEntropy => CrossEntropyLoss::loss(predicted, expected),
        }
    }

    /// ∂L/∂predicted as a row vector.
    pub fn derivative(&self, predicted: &Matrix, expected: &Matrix) -> Result<Matrix> {
        match self {
            LossType::Mse => MseLoss::derivative(predicted, expected),
            LossType::CrossEntropy => CrossEntropyLoss::derivative(predicted, expected),
        }
    }
}
