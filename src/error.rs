use thiserror::Error;

/// Everything the network and the dataset loader can fail with.
#[derive(Error, Debug)]
pub enum NetError {
    /// Invalid network description (layer sizes, learning rate, spec file).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A vector or matrix did not have the shape the operation requires.
    /// Shapes are `(rows, cols)`.
    #[error("dimension error in {context}: expected {expected:?}, got {actual:?}")]
    Dimension {
        context: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Missing, unreadable or truncated file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for NetError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            NetError::Io(e.into())
        } else {
            NetError::Configuration(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, NetError>;

impl NetError {
    pub(crate) fn dimension(
        context: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> NetError {
        NetError::Dimension { context, expected, actual }
    }
}
