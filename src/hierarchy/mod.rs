//! Merge trees produced by agglomerative clustering.
//!
//! [`MergeTree`] records the complete merge history of a hierarchical
//! clustering run as an arena of [`Merge`] records indexed by cluster id:
//!
//! ```text
//! id      │ meaning
//! ────────┼──────────────────────────────
//! 0..n    │ original items (leaves)
//! n + i   │ cluster created by merge i
//! 2n − 2  │ root, once all n − 1 merges exist
//! ```
//!
//! From a tree you can read off:
//!
//! - a **leaf order** ([`MergeTree::leaf_order`]) for drawing a dendrogram or
//!   reordering heatmap rows without crossing branches;
//! - a **flat clustering** by cutting at a height
//!   ([`MergeTree::cut_at_distance`]) or at a cluster count
//!   ([`MergeTree::cut_to_k`]).

mod dendrogram;
mod merge_tree;

pub use merge_tree::{Merge, MergeTree};
