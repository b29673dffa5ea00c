//! Hierarchical clustering of samples.
//!
//! After factorization every sample is a short feature row: its proportions
//! over the latent types plus a few rescaled indicators. This module groups
//! those rows with **Ward's minimum-variance** agglomerative clustering.
//!
//! ## Hierarchical (Agglomerative) Clustering
//!
//! Bottom-up: start with each point as its own cluster, repeatedly merge
//! the two closest clusters until one remains. The merge history forms a
//! **dendrogram**, a binary tree you can cut at any height to get k clusters.
//!
//! Ward defines "closest" as the merge that increases total within-cluster
//! variance the least:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! This is the same objective k-means minimizes, pursued greedily one merge at
//! a time, so Ward tends to produce compact, similarly sized groups.
//!
//! ## Usage
//!
//! ```rust
//! use typology::cluster::{build_linkage, Clustering, WardClustering};
//! use ndarray::array;
//!
//! let features = array![[0.0, 0.0], [0.0, 1.0], [5.0, 5.0], [5.0, 6.0]];
//! let tree = build_linkage(features.view()).unwrap();
//! assert_eq!(tree.n_merges(), 3);
//! assert!(tree.is_monotonic());
//!
//! let data = vec![vec![0.0, 0.0], vec![0.1, 0.1], vec![10.0, 10.0], vec![10.1, 10.1]];
//! let labels = WardClustering::new(2).fit_predict(&data).unwrap();
//! assert_eq!(labels, vec![0, 0, 1, 1]);
//! ```

mod traits;
mod ward;

pub use traits::Clustering;
pub use ward::{build_linkage, WardClustering};
