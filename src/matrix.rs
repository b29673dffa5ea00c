//! Labeled dense matrices and input validation.
//!
//! Every stage of the pipeline works on a plain `Array2<f64>`, but the data
//! coming in and going out is keyed: rows are samples (countries), columns are
//! features (categories, indicators, latent types). [`LabeledMatrix`] keeps the
//! two label axes attached to the values so that joins and reports never have
//! to guess which row is which.
//!
//! ```rust
//! use typology::LabeledMatrix;
//!
//! let counts = LabeledMatrix::from_rows(
//!     vec!["Chile".into(), "Peru".into()],
//!     vec!["anchovy".into(), "salmon".into()],
//!     &[vec![3.0, 9.0], vec![12.0, 0.0]],
//! )
//! .unwrap();
//! assert_eq!(counts.get("Peru", "anchovy"), Some(12.0));
//! ```

use crate::error::{Error, Result};
use ndarray::{concatenate, Array2, ArrayView1, ArrayView2, Axis};
use std::collections::{HashMap, HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A dense `f64` matrix with unique row and column labels.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabeledMatrix {
    rows: Vec<String>,
    cols: Vec<String>,
    values: Array2<f64>,
}

impl LabeledMatrix {
    /// Attach labels to a matrix.
    ///
    /// Fails if the label counts do not match the shape or a label repeats.
    pub fn new(rows: Vec<String>, cols: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if rows.len() != values.nrows() {
            return Err(Error::DimensionMismatch {
                expected: values.nrows(),
                found: rows.len(),
            });
        }
        if cols.len() != values.ncols() {
            return Err(Error::DimensionMismatch {
                expected: values.ncols(),
                found: cols.len(),
            });
        }
        ensure_unique(&rows)?;
        ensure_unique(&cols)?;
        Ok(Self { rows, cols, values })
    }

    /// Build from row vectors.
    pub fn from_rows(rows: Vec<String>, cols: Vec<String>, data: &[Vec<f64>]) -> Result<Self> {
        let values = if data.is_empty() {
            Array2::zeros((0, cols.len()))
        } else {
            to_array(data)?
        };
        Self::new(rows, cols, values)
    }

    /// Single-column matrix, e.g. one auxiliary indicator per sample.
    pub fn from_column(rows: Vec<String>, name: impl Into<String>, values: &[f64]) -> Result<Self> {
        let column = Array2::from_shape_vec((values.len(), 1), values.to_vec())
            .map_err(|e| Error::ShapeMismatch {
                expected: format!("{}x1", values.len()),
                actual: e.to_string(),
            })?;
        Self::new(rows, vec![name.into()], column)
    }

    /// Row labels (sample identifiers).
    pub fn row_labels(&self) -> &[String] {
        &self.rows
    }

    /// Column labels (feature identifiers).
    pub fn col_labels(&self) -> &[String] {
        &self.cols
    }

    /// Underlying values.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// Position of a row label.
    pub fn row_index(&self, label: &str) -> Option<usize> {
        self.rows.iter().position(|r| r == label)
    }

    /// Position of a column label.
    pub fn col_index(&self, label: &str) -> Option<usize> {
        self.cols.iter().position(|c| c == label)
    }

    /// View of the row with the given label.
    pub fn row(&self, label: &str) -> Option<ArrayView1<'_, f64>> {
        self.row_index(label).map(|i| self.values.row(i))
    }

    /// Single entry by labels.
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.row_index(row)?;
        let j = self.col_index(col)?;
        Some(self.values[[i, j]])
    }

    /// Same labels, new values of the same shape.
    pub fn with_values(&self, values: Array2<f64>) -> Result<Self> {
        if values.dim() != self.values.dim() {
            return Err(Error::ShapeMismatch {
                expected: format!("{}x{}", self.nrows(), self.ncols()),
                actual: format!("{}x{}", values.nrows(), values.ncols()),
            });
        }
        Ok(Self {
            rows: self.rows.clone(),
            cols: self.cols.clone(),
            values,
        })
    }

    /// Keep the listed rows, in the listed order.
    pub fn select_rows(&self, labels: &[String]) -> Result<Self> {
        let index: HashMap<&str, usize> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.as_str(), i))
            .collect();
        let mut picked = Vec::with_capacity(labels.len());
        for label in labels {
            match index.get(label.as_str()) {
                Some(&i) => picked.push(i),
                None => {
                    return Err(Error::ShapeMismatch {
                        expected: format!("row '{label}'"),
                        actual: "no such row".to_string(),
                    })
                }
            }
        }
        Self::new(
            labels.to_vec(),
            self.cols.clone(),
            self.values.select(Axis(0), &picked),
        )
    }

    /// Row labels present in both matrices, in `self`'s order.
    pub fn shared_rows(&self, other: &LabeledMatrix) -> Vec<String> {
        let theirs: HashSet<&str> = other.rows.iter().map(String::as_str).collect();
        self.rows
            .iter()
            .filter(|r| theirs.contains(r.as_str()))
            .cloned()
            .collect()
    }

    /// Inner join on row labels, concatenating columns.
    ///
    /// Rows missing from either side are dropped; the surviving rows keep
    /// `self`'s order. Column labels must not collide.
    pub fn inner_join(&self, other: &LabeledMatrix) -> Result<Self> {
        let rows = self.shared_rows(other);
        let left = self.select_rows(&rows)?;
        let right = other.select_rows(&rows)?;

        let mut cols = left.cols.clone();
        cols.extend(right.cols.iter().cloned());

        let values = concatenate(Axis(1), &[left.values.view(), right.values.view()]).map_err(
            |e| Error::ShapeMismatch {
                expected: format!("{} joined rows", rows.len()),
                actual: e.to_string(),
            },
        )?;
        Self::new(rows, cols, values)
    }

    /// Split into labels and values.
    pub fn into_parts(self) -> (Vec<String>, Vec<String>, Array2<f64>) {
        (self.rows, self.cols, self.values)
    }
}

fn ensure_unique(labels: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(Error::DuplicateLabel(label.clone()));
        }
    }
    Ok(())
}

/// Convert row vectors into an `Array2`, checking that every row has the same length.
pub fn to_array(data: &[Vec<f64>]) -> Result<Array2<f64>> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    let n = data.len();
    let d = data[0].len();

    let mut flat: Vec<f64> = Vec::with_capacity(n * d);
    for point in data {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
        flat.extend(point);
    }
    Array2::from_shape_vec((n, d), flat).map_err(|e| Error::ShapeMismatch {
        expected: format!("{n}x{d}"),
        actual: e.to_string(),
    })
}

/// Reject empty matrices and NaN / infinite entries.
pub(crate) fn check_finite(values: ArrayView2<'_, f64>) -> Result<()> {
    if values.is_empty() {
        return Err(Error::EmptyInput);
    }
    for ((row, col), &value) in values.indexed_iter() {
        if !value.is_finite() {
            return Err(Error::NonFiniteEntry { row, col, value });
        }
    }
    Ok(())
}

/// [`check_finite`], plus every entry must be `>= 0`.
pub(crate) fn check_non_negative(values: ArrayView2<'_, f64>) -> Result<()> {
    check_finite(values)?;
    for ((row, col), &value) in values.indexed_iter() {
        if value < 0.0 {
            return Err(Error::NegativeEntry { row, col, value });
        }
    }
    Ok(())
}
