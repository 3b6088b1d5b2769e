use serde::{Deserialize, Serialize};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the loop
/// sends one `EpochStats` at the end of every completed epoch, which lets a
/// caller running training on a worker thread report progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean loss over the epoch, each sample measured just before its update.
    pub train_loss: f64,
    /// Mean validation loss, if a validation set was provided.
    pub val_loss: Option<f64>,
    /// Fraction in [0, 1]; only set when the network trains on cross-entropy.
    pub train_accuracy: Option<f64>,
    pub val_accuracy: Option<f64>,
    /// Wall-clock duration of the training pass in milliseconds.
    pub elapsed_ms: u64,
}
