//! Min-max column scaling.
//!
//! ```text
//! v' = (v - min_j) / (max_j - min_j)
//! ```
//!
//! # Constant columns
//!
//! A column with `max == min` has no spread to rescale. Such a column is
//! mapped to all zeros rather than divided by zero. This erases whatever
//! signal the column carried, so [`MinMaxScaler::degenerate_columns`] reports
//! which columns were affected and a warning is logged when they are scaled.

use crate::error::{Error, Result};
use crate::matrix::{check_finite, LabeledMatrix};
use ndarray::{Array1, Array2, ArrayView2, Axis};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-column min-max scaler.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MinMaxScaler {
    min: Array1<f64>,
    max: Array1<f64>,
}

impl MinMaxScaler {
    /// Record per-column minimum and maximum.
    pub fn fit(values: ArrayView2<'_, f64>) -> Result<Self> {
        check_finite(values)?;
        let min = values.fold_axis(Axis(0), f64::INFINITY, |acc, &v| acc.min(v));
        let max = values.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &v| acc.max(v));
        if let Some(j) = (0..min.len()).find(|&j| !(max[j] - min[j]).is_finite()) {
            return Err(Error::Overflow {
                what: format!("range of column {j}"),
            });
        }
        Ok(Self { min, max })
    }

    /// Scale `values` with the fitted ranges.
    ///
    /// Values outside the fitted range land outside `[0, 1]`; a value so far
    /// outside that it overflows is an error. Constant columns map to `0.0`.
    pub fn transform(&self, values: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        check_finite(values)?;
        if values.ncols() != self.min.len() {
            return Err(Error::DimensionMismatch {
                expected: self.min.len(),
                found: values.ncols(),
            });
        }

        let degenerate = self.degenerate_columns();
        if !degenerate.is_empty() {
            log::warn!("min-max: constant columns {degenerate:?} scaled to 0");
        }

        let mut out = values.to_owned();
        for (j, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            let lo = self.min[j];
            let span = self.max[j] - lo;
            if span > 0.0 {
                column.mapv_inplace(|v| (v - lo) / span);
            } else {
                column.fill(0.0);
            }
            if column.iter().any(|v| !v.is_finite()) {
                return Err(Error::Overflow {
                    what: format!("scaled values of column {j}"),
                });
            }
        }
        Ok(out)
    }

    /// Fit and transform in one step.
    pub fn fit_transform(values: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        Self::fit(values)?.transform(values)
    }

    /// Scale every column of a labeled matrix; labels are preserved.
    pub fn scale_labeled(matrix: &LabeledMatrix) -> Result<LabeledMatrix> {
        let scaled = Self::fit_transform(matrix.values().view())?;
        matrix.with_values(scaled)
    }

    /// Indices of columns whose fitted minimum equals their maximum.
    pub fn degenerate_columns(&self) -> Vec<usize> {
        self.min
            .iter()
            .zip(self.max.iter())
            .enumerate()
            .filter(|(_, (lo, hi))| hi <= lo)
            .map(|(j, _)| j)
            .collect()
    }

    /// Fitted column minima.
    pub fn min(&self) -> &Array1<f64> {
        &self.min
    }

    /// Fitted column maxima.
    pub fn max(&self) -> &Array1<f64> {
        &self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_scales_each_column_independently() {
        let x = array![[1.0, 10.0], [3.0, 30.0], [2.0, 20.0]];
        let scaled = MinMaxScaler::fit_transform(x.view()).unwrap();
        assert_eq!(scaled, array![[0.0, 0.0], [1.0, 1.0], [0.5, 0.5]]);
        // input untouched
        assert_eq!(x[[1, 1]], 30.0);
    }

    #[test]
    fn test_constant_column_maps_to_zero() {
        let x = array![[2.0, 1.0], [2.0, 5.0], [2.0, 3.0]];
        let scaler = MinMaxScaler::fit(x.view()).unwrap();
        assert_eq!(scaler.degenerate_columns(), vec![0]);

        let scaled = scaler.transform(x.view()).unwrap();
        assert!(scaled.column(0).iter().all(|&v| v == 0.0));
        assert_eq!(scaled.column(1).to_vec(), vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_transform_width_checked() {
        let scaler = MinMaxScaler::fit(array![[0.0, 1.0]].view()).unwrap();
        let err = scaler.transform(array![[0.0]].view()).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_rejects_non_finite_and_empty() {
        assert!(MinMaxScaler::fit(array![[f64::INFINITY]].view()).is_err());
        assert_eq!(
            MinMaxScaler::fit(Array2::<f64>::zeros((0, 2)).view()),
            Err(Error::EmptyInput)
        );
    }

    #[test]
    fn test_overflowing_range_rejected() {
        let x = array![[-f64::MAX], [f64::MAX], [0.0]];
        let err = MinMaxScaler::fit_transform(x.view()).unwrap_err();
        assert!(matches!(err, Error::Overflow { .. }));
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_overflow_outside_fitted_range_rejected() {
        let narrow = MinMaxScaler::fit(array![[0.0], [1e-300]].view()).unwrap();
        assert!(matches!(
            narrow.transform(array![[1e10]].view()),
            Err(Error::Overflow { .. })
        ));

        let scaler = MinMaxScaler::fit(array![[-1.0], [1.0]].view()).unwrap();
        assert_eq!(
            scaler.transform(array![[3.0]].view()).unwrap(),
            array![[2.0]]
        );
    }

    #[test]
    fn test_scale_labeled_keeps_labels() {
        let m = LabeledMatrix::from_column(
            vec!["a".into(), "b".into()],
            "gdp_per_capita",
            &[100.0, 300.0],
        )
        .unwrap();
        let scaled = MinMaxScaler::scale_labeled(&m).unwrap();
        assert_eq!(scaled.col_labels(), m.col_labels());
        assert_eq!(scaled.get("b", "gdp_per_capita"), Some(1.0));
    }
}
