//! Command-line driver for the `nnet` library.
//!
//! ```text
//! nnet digits --images train-images-idx3-ubyte --labels train-labels-idx1-ubyte
//! nnet sum --epochs 200
//! nnet init-config --out digits.json
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use clap::{Parser, Subcommand};
use rand::Rng;
use tracing::subscriber::SetGlobalDefaultError;
use tracing::{info, Level};

use nnet::train::{self, EpochStats, TrainConfig};
use nnet::{ActivationFunction, Dataset, LossType, Matrix, NetError, Network, NetworkSpec};

#[derive(Parser)]
#[command(version, about = "Hand-written feed-forward network trainer")]
struct Cli {
    /// Log debug events (per-epoch statistics)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a digit classifier on an IDX image/label file pair
    Digits {
        #[arg(long, value_name = "PATH")]
        images: PathBuf,
        #[arg(long, value_name = "PATH")]
        labels: PathBuf,
        /// Held-out IDX image file, evaluated after every epoch
        #[arg(long, value_name = "PATH", requires = "test_labels")]
        test_images: Option<PathBuf>,
        #[arg(long, value_name = "PATH", requires = "test_images")]
        test_labels: Option<PathBuf>,
        /// Network spec JSON; defaults to 784-100-50-10 ReLU/Softmax/cross-entropy
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
        #[arg(short, long, value_name = "INT", default_value_t = 1)]
        epochs: usize,
        /// Only use the first N training samples
        #[arg(long, value_name = "INT")]
        limit: Option<usize>,
    },
    /// Train a small regression network to add two numbers
    Sum {
        #[arg(short, long, value_name = "INT", default_value_t = 200)]
        epochs: usize,
        #[arg(short, long, value_name = "INT", default_value_t = 100)]
        samples: usize,
    },
    /// Write the default network spec as JSON
    InitConfig {
        #[arg(short, long, value_name = "PATH")]
        out: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Command::Digits { images, labels, test_images, test_labels, config, epochs, limit } => {
            let spec = match config {
                Some(path) => NetworkSpec::load_json(path)?,
                None => NetworkSpec::default(),
            };
            let test = match (test_images, test_labels) {
                (Some(i), Some(l)) => Some((i, l)),
                _ => None,
            };
            run_digits(spec, images, labels, test, epochs, limit)?;
        }
        Command::Sum { epochs, samples } => run_sum(epochs, samples)?,
        Command::InitConfig { out } => {
            NetworkSpec::default().save_json(&out)?;
            println!("Wrote default network spec to {}", out.display());
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) -> Result<(), SetGlobalDefaultError> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

/// Normalized pixel vectors and one-hot teachers for every sample.
fn prepare(
    dataset: &Dataset,
    n_classes: usize,
    limit: Option<usize>,
) -> nnet::Result<(Vec<Matrix>, Vec<Matrix>)> {
    let take = limit.unwrap_or(dataset.len());
    let mut inputs = Vec::with_capacity(take.min(dataset.len()));
    let mut teachers = Vec::with_capacity(take.min(dataset.len()));
    for sample in dataset.iter().take(take) {
        inputs.push(sample.to_normalized_vector());
        teachers.push(sample.one_hot(n_classes)?);
    }
    Ok((inputs, teachers))
}

fn run_digits(
    spec: NetworkSpec,
    images: PathBuf,
    labels: PathBuf,
    test: Option<(PathBuf, PathBuf)>,
    epochs: usize,
    limit: Option<usize>,
) -> nnet::Result<()> {
    let train_set = Dataset::load(&images, &labels)?;
    let n_pixels = train_set.height() * train_set.width();
    let n_classes = spec.layer_sizes[spec.layer_sizes.len() - 1];
    if spec.layer_sizes[0] != n_pixels {
        return Err(NetError::Configuration(format!(
            "network input width {} does not match {}x{} images",
            spec.layer_sizes[0],
            train_set.height(),
            train_set.width()
        )));
    }

    let (inputs, teachers) = prepare(&train_set, n_classes, limit)?;
    let validation = match test {
        Some((i, l)) => Some(prepare(&Dataset::load(i, l)?, n_classes, None)?),
        None => None,
    };

    let mut network = Network::from_spec(&spec)?;
    let (tx, rx) = mpsc::channel::<EpochStats>();
    info!(samples = inputs.len(), epochs, "training digit classifier");

    // Training runs on a worker; this thread only prints progress.
    let worker = thread::spawn(move || {
        let config = TrainConfig::new(epochs).with_progress(tx);
        let val = validation.as_ref().map(|(vi, vt)| (vi.as_slice(), vt.as_slice()));
        train::train_loop(&mut network, &inputs, &teachers, val, &config).map(|_| network)
    });

    for stats in rx {
        let val = match (stats.val_loss, stats.val_accuracy) {
            (Some(l), Some(a)) => format!("  val loss {:>9.6}  val acc {:>6.2}%", l, a * 100.0),
            _ => String::new(),
        };
        println!(
            "epoch {:>3}/{}  loss {:>9.6}  acc {:>6.2}%{}  ({} ms)",
            stats.epoch,
            stats.total_epochs,
            stats.train_loss,
            stats.train_accuracy.unwrap_or(0.0) * 100.0,
            val,
            stats.elapsed_ms
        );
    }

    let network = worker
        .join()
        .map_err(|_| NetError::Configuration("training thread panicked".into()))??;

    if let Some(sample) = train_set.get(0) {
        let output = network.forward(&sample.to_normalized_vector())?;
        println!(
            "first sample: label {}  predicted {}",
            sample.label(),
            train::argmax(output.row_values())
        );
    }
    Ok(())
}

fn run_sum(epochs: usize, samples: usize) -> nnet::Result<()> {
    let spec = NetworkSpec::new(
        vec![2, 10, 1],
        ActivationFunction::ReLU,
        ActivationFunction::Identity,
        LossType::Mse,
    );
    let mut network = Network::from_spec(&spec)?;

    let mut rng = rand::thread_rng();
    let pairs: Vec<(f64, f64)> = (0..samples).map(|_| (rng.gen(), rng.gen())).collect();
    let inputs: Vec<Matrix> = pairs.iter().map(|&(x, y)| Matrix::row(vec![x, y])).collect();
    let teachers: Vec<Matrix> = pairs.iter().map(|&(x, y)| Matrix::row(vec![x + y])).collect();

    let loss = train::train_loop(&mut network, &inputs, &teachers, None, &TrainConfig::new(epochs))?;
    println!("final training loss: {:.6}", loss);

    for (x, y) in [(0.1, 0.2), (0.5, 0.25), (0.9, 0.8)] {
        let out = network.predict(&[x, y])?;
        println!("{x} + {y} ≈ {:.4}", out[0]);
    }
    Ok(())
}
