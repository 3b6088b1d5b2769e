pub mod dataset;
pub mod idx;
pub mod sample;

pub use dataset::Dataset;
pub use idx::load;
pub use sample::Sample;
