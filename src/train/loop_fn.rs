use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::seq::SliceRandom;
use tracing::debug;

use crate::error::Result;
use crate::loss::loss_type::LossType;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::check_pairs;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs and returns the mean training
/// loss of the **last completed epoch** (0.0 if no epoch ran).
///
/// Every sample gets its own gradient step; there is no batching.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Errors
/// `Configuration` if the training set is empty or inputs and teachers differ
/// in length; `Dimension` if a sample does not fit the network.
pub fn train_loop(
    network: &mut Network,
    train_inputs: &[Matrix],
    train_teachers: &[Matrix],
    validation: Option<(&[Matrix], &[Matrix])>,
    config: &TrainConfig,
) -> Result<f64> {
    check_pairs(train_inputs, train_teachers)?;
    if let Some((vi, vt)) = validation {
        check_pairs(vi, vt)?;
    }

    let classifier = network.loss() == LossType::CrossEntropy;
    let mut order: Vec<usize> = (0..train_inputs.len()).collect();
    let mut last_train_loss = 0.0;

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            break;
        }

        let t_start = Instant::now();

        if config.shuffle {
            order.shuffle(&mut rand::thread_rng());
        }
        let mut total_loss = 0.0;
        for &idx in &order {
            total_loss += network.train_step(&train_inputs[idx], &train_teachers[idx])?;
        }
        let train_loss = total_loss / order.len() as f64;
        last_train_loss = train_loss;

        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        let train_accuracy = if classifier {
            Some(accuracy(network, train_inputs, train_teachers)?)
        } else {
            None
        };

        let (val_loss, val_accuracy) = match validation {
            Some((vi, vt)) => {
                let loss = evaluate_loss(network, vi, vt)?;
                let acc = if classifier { Some(accuracy(network, vi, vt)?) } else { None };
                (Some(loss), acc)
            }
            None => (None, None),
        };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            val_loss,
            train_accuracy,
            val_accuracy,
            elapsed_ms,
        };
        debug!(?stats, "epoch finished");

        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    Ok(last_train_loss)
}

// ---------------------------------------------------------------------------
// Evaluation helpers
// ---------------------------------------------------------------------------

/// Mean loss over a dataset without touching the parameters.
pub fn evaluate_loss(network: &Network, inputs: &[Matrix], teachers: &[Matrix]) -> Result<f64> {
    if inputs.is_empty() {
        return Ok(0.0);
    }
    let mut total = 0.0;
    for (input, teacher) in inputs.iter().zip(teachers) {
        total += network.forward_with_loss(input, teacher)?.1;
    }
    Ok(total / inputs.len() as f64)
}

/// Fraction of samples whose predicted argmax equals the teacher's argmax.
pub fn accuracy(network: &Network, inputs: &[Matrix], teachers: &[Matrix]) -> Result<f64> {
    if inputs.is_empty() {
        return Ok(0.0);
    }
    let mut correct = 0usize;
    for (input, teacher) in inputs.iter().zip(teachers) {
        let output = network.forward(input)?;
        if argmax(output.row_values()) == argmax(teacher.row_values()) {
            correct += 1;
        }
    }
    Ok(correct as f64 / inputs.len() as f64)
}

/// Index of the maximum element in a slice (first one on ties, 0 if empty).
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, &x) in v.iter().enumerate() {
        if x > v[best] {
            best = i;
        }
    }
    best
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}
