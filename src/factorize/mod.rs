//! Non-negative matrix factorization.
//!
//! Splits a non-negative observation matrix `X` (samples × features) into a
//! mixture matrix `W` (samples × k) and a basis matrix `H` (k × features):
//!
//! ```text
//! X ≈ W · H,    W ≥ 0,  H ≥ 0
//! ```
//!
//! Each row of `H` is a latent "type": a non-negative weighting over the
//! original features. Each row of `W` says how much of every type a sample
//! contains; after [`crate::preprocess::normalize_rows`] it reads as a
//! proportion.
//!
//! Non-negativity is what makes the factors interpretable. A sample is built
//! only by *adding* types, never by cancelling one against another, so the
//! types tend to be parts (groups of co-occurring categories) rather than
//! abstract directions as in PCA.
//!
//! ## Usage
//!
//! ```rust
//! use ndarray::array;
//! use typology::factorize::{InitStrategy, Nmf};
//!
//! let x = array![
//!     [5.0, 4.0, 0.0, 0.0],
//!     [4.0, 5.0, 0.0, 1.0],
//!     [0.0, 0.0, 6.0, 5.0],
//!     [0.0, 1.0, 5.0, 6.0],
//! ];
//!
//! let fit = Nmf::new(2)
//!     .with_init(InitStrategy::Structured)
//!     .with_max_iter(500)
//!     .factorize(x.view())
//!     .unwrap();
//!
//! assert_eq!(fit.w.dim(), (4, 2));
//! assert_eq!(fit.h.dim(), (2, 4));
//! assert!(fit.w.iter().all(|&v| v >= 0.0));
//! ```
//!
//! ## References
//!
//! - Lee & Seung (2001). "Algorithms for Non-negative Matrix Factorization." NIPS.
//! - Boutsidis & Gallopoulos (2008). "SVD based initialization: A head start
//!   for nonnegative matrix factorization." Pattern Recognition.

mod init;
mod nmf;
mod profile;

pub use nmf::{
    component_labels, factorize, Convergence, InitStrategy, LabeledFactors, Nmf, NmfConfig,
    NmfFit,
};
pub use profile::{top_features, ComponentProfile};
