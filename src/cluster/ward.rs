//! Ward (minimum-variance) agglomerative clustering.
//!
//! Bottom-up clustering that builds a [`MergeTree`] by repeatedly merging the
//! two clusters whose union increases the total within-cluster sum of squares
//! the least:
//!
//! ```text
//! Δ(A,B) = (nₐ × nᵦ)/(nₐ + nᵦ) × ‖μₐ − μᵦ‖²
//! ```
//!
//! # Lance–Williams update
//!
//! Centroids are never stored. Starting from squared Euclidean distances
//! between points, the dissimilarity of a fresh cluster `A∪B` to every other
//! cluster `C` follows from the old ones:
//!
//! ```text
//! d(A∪B, C) = ((nₐ+n꜀)·d(A,C) + (nᵦ+n꜀)·d(B,C) − n꜀·d(A,B)) / (nₐ+nᵦ+n꜀)
//! ```
//!
//! Here `d(A,B) = 2·Δ(A,B)`. The recorded merge distance is `√d(A,B)`, the
//! SciPy convention: two single points merge at their Euclidean distance.
//!
//! # Ties
//!
//! Among pairs with exactly equal dissimilarity, the pair with the lowest
//! `(smaller id, larger id)` wins. Near-duplicate rows make such ties real,
//! and fixing the rule keeps the tree reproducible.
//!
//! # Cost
//!
//! A full scan of the live distance matrix per merge: O(n³) time, O(n²)
//! space. Comfortable for the tens to low hundreds of samples this is used on.

use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::hierarchy::MergeTree;
use crate::matrix::{check_finite, to_array};
use ndarray::{Array2, ArrayView2};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Build the Ward merge tree over the rows of `features` (n × d, n ≥ 2).
///
/// Returns exactly `n - 1` merges with non-decreasing distances. Rows far
/// enough apart that a squared distance overflows `f64` give
/// [`Error::Overflow`].
pub fn build_linkage(features: ArrayView2<'_, f64>) -> Result<MergeTree> {
    check_finite(features)?;
    let n = features.nrows();
    if n < 2 {
        return Err(Error::invalid_parameter(
            "n_samples",
            format!("Ward linkage needs at least 2 rows, got {n}"),
        ));
    }

    let mut dist = pairwise_squared(features);
    if let Some(((i, j), _)) = dist.indexed_iter().find(|(_, d)| !d.is_finite()) {
        return Err(Error::Overflow {
            what: format!("squared distance between rows {i} and {j}"),
        });
    }
    // Slot `s` holds cluster `id[s]` of `size[s]` leaves while `s` is in `live`.
    let mut id: Vec<usize> = (0..n).collect();
    let mut size = vec![1usize; n];
    let mut live: Vec<usize> = (0..n).collect();
    let mut tree = MergeTree::with_capacity(n);

    for step in 0..n - 1 {
        let (a, b) = closest_pair(&dist, &live, &id);
        let d_ab = dist[[a, b]];
        let (na, nb) = (size[a], size[b]);

        for &c in &live {
            if c == a || c == b {
                continue;
            }
            let nc = size[c];
            let updated = ((na + nc) as f64 * dist[[a, c]] + (nb + nc) as f64 * dist[[b, c]]
                - nc as f64 * d_ab)
                / (na + nb + nc) as f64;
            if !updated.is_finite() {
                return Err(Error::Overflow {
                    what: format!("Ward dissimilarity at merge {step}"),
                });
            }
            // Rounding can leave a true zero slightly negative.
            let updated = if updated < 0.0 { 0.0 } else { updated };
            dist[[a, c]] = updated;
            dist[[c, a]] = updated;
        }

        let (left, right) = ordered(id[a], id[b]);
        let height = d_ab.sqrt();
        tree.push(left, right, height, na + nb);
        log::trace!(
            "ward merge {step}: {left} + {right} -> {} at {height:.6} (size {})",
            n + step,
            na + nb
        );

        id[a] = n + step;
        size[a] = na + nb;
        live.retain(|&s| s != b);
    }

    log::debug!(
        "ward: {n} rows merged, root height {:.6}",
        tree.merges().last().map_or(0.0, |m| m.distance)
    );
    Ok(tree)
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Live slots `(a, b)`, `a < b`, with the smallest dissimilarity; ties go to
/// the lowest cluster-id pair.
fn closest_pair(dist: &Array2<f64>, live: &[usize], id: &[usize]) -> (usize, usize) {
    let mut best = (live[0], live[1]);
    let mut best_d = dist[[live[0], live[1]]];
    let mut best_key = ordered(id[live[0]], id[live[1]]);

    for (p, &a) in live.iter().enumerate() {
        for &b in &live[p + 1..] {
            let d = dist[[a, b]];
            let key = ordered(id[a], id[b]);
            if d < best_d || (d == best_d && key < best_key) {
                best = (a, b);
                best_d = d;
                best_key = key;
            }
        }
    }
    best
}

/// Symmetric matrix of squared Euclidean distances between rows.
fn pairwise_squared(features: ArrayView2<'_, f64>) -> Array2<f64> {
    let n = features.nrows();
    let row_of = |i: usize| -> Vec<f64> {
        let x = features.row(i);
        (0..n)
            .map(|j| {
                x.iter()
                    .zip(features.row(j).iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>()
            })
            .collect()
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<f64>> = (0..n).into_par_iter().map(row_of).collect();

    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<f64>> = (0..n).map(row_of).collect();

    Array2::from_shape_fn((n, n), |(i, j)| rows[i][j])
}

/// Ward clustering cut to a fixed number of clusters.
#[derive(Debug, Clone)]
pub struct WardClustering {
    n_clusters: usize,
}

impl WardClustering {
    /// Clusterer producing `n_clusters` flat clusters.
    pub fn new(n_clusters: usize) -> Self {
        Self { n_clusters }
    }

    /// Fit and return the full merge tree.
    pub fn fit_tree(&self, data: &[Vec<f64>]) -> Result<MergeTree> {
        build_linkage(to_array(data)?.view())
    }
}

impl Clustering for WardClustering {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        if self.n_clusters == 0 || self.n_clusters > data.len() {
            return Err(Error::InvalidClusterCount {
                requested: self.n_clusters,
                n_items: data.len(),
            });
        }
        self.fit_tree(data)?.cut_to_k(self.n_clusters)
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}
