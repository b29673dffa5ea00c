//! # typology
//!
//! Latent-type discovery for labeled count tables.
//!
//! Given a non-negative samples × categories matrix (for instance, factories
//! per country per species), `typology`:
//!
//! 1. factorizes it with NMF into a few interpretable **types**
//!    ([`factorize`]),
//! 2. turns each sample's type weights into proportions and rescales any
//!    auxiliary indicators to `[0, 1]` ([`preprocess`]),
//! 3. clusters samples with Ward's method into a merge tree ([`cluster`]),
//! 4. reads a dendrogram leaf order and flat clusters off that tree
//!    ([`hierarchy`]).
//!
//! [`Typology`] chains the four steps over [`LabeledMatrix`] inputs.
//!
//! ```rust
//! use typology::{Cut, LabeledMatrix, Typology};
//! use ndarray::array;
//!
//! let counts = LabeledMatrix::new(
//!     vec!["A".into(), "B".into(), "C".into(), "D".into()],
//!     vec!["cod".into(), "hake".into(), "tuna".into()],
//!     array![[9.0, 7.0, 0.0], [8.0, 9.0, 1.0], [0.0, 1.0, 9.0], [1.0, 0.0, 8.0]],
//! )
//! .unwrap();
//!
//! let report = Typology::new(2)
//!     .with_cut(Cut::Clusters(2))
//!     .run(&counts, None)
//!     .unwrap();
//!
//! assert_eq!(report.tree.n_merges(), 3);
//! assert_eq!(report.ordered_labels().len(), 4);
//! ```
//!
//! Everything is single-threaded batch computation over in-memory matrices.
//! The `parallel` feature spreads the element-wise NMF updates and the
//! pairwise distance matrix over rayon's pool without changing results.

#![forbid(unsafe_code)]

pub mod cluster;
/// Error types used across `typology`.
pub mod error;
pub mod factorize;
pub mod hierarchy;
pub mod matrix;
pub mod pipeline;
pub mod preprocess;

pub use cluster::{build_linkage, Clustering, WardClustering};
pub use error::{Error, ErrorKind, Result};
pub use factorize::{
    factorize, top_features, ComponentProfile, Convergence, InitStrategy, LabeledFactors, Nmf,
    NmfConfig, NmfFit,
};
pub use hierarchy::{Merge, MergeTree};
pub use matrix::LabeledMatrix;
pub use pipeline::{Cut, Typology, TypologyConfig, TypologyReport};
pub use preprocess::{normalize_rows, MinMaxScaler};
