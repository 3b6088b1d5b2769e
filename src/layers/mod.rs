pub mod affine;
pub mod dense;

pub use dense::Layer;
