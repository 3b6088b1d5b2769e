use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;

/// Fails unless `m` is a single row.
pub(crate) fn expect_row(context: &'static str, m: &Matrix) -> Result<()> {
    if m.is_row() {
        Ok(())
    } else {
        Err(NetError::dimension(context, (1, m.cols), m.shape()))
    }
}

/// Fails unless `m` is a `1 x width` row vector.
pub(crate) fn expect_row_of(context: &'static str, m: &Matrix, width: usize) -> Result<()> {
    if m.shape() == (1, width) {
        Ok(())
    } else {
        Err(NetError::dimension(context, (1, width), m.shape()))
    }
}

/// Fails unless `a` and `b` are row vectors of the same width.
pub(crate) fn expect_matching_rows(context: &'static str, a: &Matrix, b: &Matrix) -> Result<()> {
    expect_row(context, a)?;
    expect_row_of(context, b, a.cols)
}
