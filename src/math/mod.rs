pub mod init;
pub mod matrix;
pub(crate) mod shape;

pub use matrix::Matrix;
