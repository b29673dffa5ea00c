//! Flat-clustering interface.

use crate::error::Result;

/// An algorithm that assigns each row of a feature matrix to one cluster.
pub trait Clustering {
    /// Cluster `data` (one feature row per sample) and return one label per
    /// row, numbered `0..n_clusters`.
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>>;

    /// Number of clusters produced by [`Clustering::fit_predict`].
    fn n_clusters(&self) -> usize;
}
