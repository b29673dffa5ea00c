//! Row normalization of mixture matrices.
//!
//! Each row of W becomes a distribution over latent types. A row summing to
//! zero (a sample whose counts were all zero) has no such distribution; it is
//! reported as [`Error::DegenerateRow`] instead of producing NaN.

use crate::error::{Error, Result};
use crate::matrix::{check_non_negative, LabeledMatrix};
use ndarray::{Array2, ArrayView2, Axis};

/// Divide each row by its sum.
///
/// Input must be finite and non-negative. Fails on the first row whose sum is zero.
pub fn normalize_rows(values: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    check_non_negative(values)?;

    let sums = values.sum_axis(Axis(1));
    if let Some(row) = sums.iter().position(|&s| s <= 0.0) {
        return Err(Error::DegenerateRow { row });
    }

    let mut out = values.to_owned();
    for (mut row, &sum) in out.axis_iter_mut(Axis(0)).zip(sums.iter()) {
        row /= sum;
    }
    Ok(out)
}

/// [`normalize_rows`] on a labeled matrix.
pub fn normalize_labeled_rows(matrix: &LabeledMatrix) -> Result<LabeledMatrix> {
    matrix.with_values(normalize_rows(matrix.values().view())?)
}
