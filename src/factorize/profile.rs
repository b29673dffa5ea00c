//! Describing components by their heaviest features.

use crate::error::{Error, Result};
use crate::matrix::LabeledMatrix;

/// The `top_n` features that weigh most in one component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentProfile {
    /// Component label (`Type i`).
    pub component: String,
    /// `(feature, weight)` by decreasing weight.
    pub features: Vec<(String, f64)>,
}

/// Top features of every row of a labeled basis matrix.
///
/// Equal weights keep their original column order. `top_n` larger than the
/// number of features returns them all.
pub fn top_features(basis: &LabeledMatrix, top_n: usize) -> Result<Vec<ComponentProfile>> {
    if top_n == 0 {
        return Err(Error::invalid_parameter("top_n", "must be at least 1"));
    }
    let names = basis.col_labels();

    Ok(basis
        .row_labels()
        .iter()
        .zip(basis.values().rows())
        .map(|(component, weights)| {
            let mut order: Vec<usize> = (0..weights.len()).collect();
            order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));
            let features = order
                .into_iter()
                .take(top_n)
                .map(|j| (names[j].clone(), weights[j]))
                .collect();
            ComponentProfile {
                component: component.clone(),
                features,
            }
        })
        .collect())
}
