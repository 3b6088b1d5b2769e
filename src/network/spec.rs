use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NetError, Result};
use crate::loss::loss_type::LossType;

/// Step size used when a spec does not set one.
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;

fn default_learning_rate() -> f64 {
    DEFAULT_LEARNING_RATE
}

/// A serializable description of a network: its layer widths, the
/// activation for hidden and output layers, the loss it trains against and
/// the gradient-descent step size.
///
/// `layer_sizes[0]` is the input width and the last entry the output width,
/// so `[784, 100, 50, 10]` builds three affine layers. Only the architecture
/// is stored; trained weights are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub layer_sizes: Vec<usize>,
    pub hidden_activation: ActivationFunction,
    pub output_activation: ActivationFunction,
    pub loss: LossType,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
}

impl NetworkSpec {
    pub fn new(
        layer_sizes: Vec<usize>,
        hidden_activation: ActivationFunction,
        output_activation: ActivationFunction,
        loss: LossType,
    ) -> NetworkSpec {
        NetworkSpec {
            layer_sizes,
            hidden_activation,
            output_activation,
            loss,
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> NetworkSpec {
        self.learning_rate = learning_rate;
        self
    }

    /// Checks that at least two layer sizes are given, none of them zero, and
    /// that the learning rate is a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if self.layer_sizes.len() < 2 {
            return Err(NetError::Configuration(format!(
                "at least 2 layer sizes are required (input and output), got {}",
                self.layer_sizes.len()
            )));
        }
        if let Some(pos) = self.layer_sizes.iter().position(|&n| n < 1) {
            return Err(NetError::Configuration(format!(
                "layer size at index {pos} must be at least 1"
            )));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NetError::Configuration(format!(
                "learning rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a spec from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<NetworkSpec> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let spec: NetworkSpec = serde_json::from_reader(reader)?;
        spec.validate()?;
        Ok(spec)
    }
}

impl Default for NetworkSpec {
    /// 28x28 digit classifier: 784 → 100 → 50 → 10, ReLU / Softmax / cross-entropy.
    fn default() -> Self {
        NetworkSpec::new(
            vec![28 * 28, 100, 50, 10],
            ActivationFunction::ReLU,
            ActivationFunction::Softmax,
            LossType::CrossEntropy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_or_zero_sizes() {
        for sizes in [vec![], vec![3], vec![3, 0], vec![0, 2, 2]] {
            let spec = NetworkSpec { layer_sizes: sizes, ..NetworkSpec::default() };
            assert!(matches!(spec.validate(), Err(NetError::Configuration(_))));
        }
    }

    #[test]
    fn rejects_bad_learning_rate() {
        for lr in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let spec = NetworkSpec::default().with_learning_rate(lr);
            assert!(matches!(spec.validate(), Err(NetError::Configuration(_))));
        }
    }

    #[test]
    fn json_uses_tags_and_defaults_learning_rate() {
        let json = r#"{
            "layer_sizes": [2, 10, 1],
            "hidden_activation": "relu",
            "output_activation": "identity",
            "loss": "mse"
        }"#;
        let spec: NetworkSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.layer_sizes, vec![2, 10, 1]);
        assert_eq!(spec.output_activation, ActivationFunction::Identity);
        assert_eq!(spec.loss, LossType::Mse);
        assert_eq!(spec.learning_rate, DEFAULT_LEARNING_RATE);
    }

    #[test]
    fn save_and_load_file() {
        let path = std::env::temp_dir().join(format!("nnet-spec-{}.json", std::process::id()));
        let spec = NetworkSpec::default().with_learning_rate(0.05);
        spec.save_json(&path).unwrap();
        let loaded = NetworkSpec::load_json(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, spec);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = NetworkSpec::load_json("/definitely/not/here/spec.json").unwrap_err();
        assert!(matches!(err, NetError::Io(_)));
    }

    #[test]
    fn malformed_json_is_configuration_error() {
        let path = std::env::temp_dir().join(format!("nnet-bad-spec-{}.json", std::process::id()));
        std::fs::write(&path, "{ \"layer_sizes\": [2, 1], ").unwrap();
        let err = NetworkSpec::load_json(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, NetError::Configuration(_)));
    }
}
