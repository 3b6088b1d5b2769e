use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};

use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// `progress_tx` receives one `EpochStats` per completed epoch; dropping
/// the receiver ends training early. Setting `stop_flag` from another
/// thread stops the loop before the next epoch starts.
pub struct TrainConfig {
    pub epochs: usize,
    pub shuffle: bool,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Shuffled epochs, no progress channel, no stop flag.
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            shuffle: true,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }
}
