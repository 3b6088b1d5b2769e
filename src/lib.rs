pub mod activation;
pub mod data;
pub mod error;
pub mod layers;
pub mod loss;
pub mod math;
pub mod network;
pub mod train;

// Convenience re-exports
pub use activation::activation::ActivationFunction;
pub use data::{Dataset, Sample};
pub use error::{NetError, Result};
pub use layers::dense::Layer;
pub use loss::loss_type::LossType;
pub use math::matrix::Matrix;
pub use network::network::Network;
pub use network::spec::NetworkSpec;
pub use train::trainer::train_network;
