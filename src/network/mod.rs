pub mod network;
pub mod spec;

pub use network::Network;
pub use spec::{NetworkSpec, DEFAULT_LEARNING_RATE};
