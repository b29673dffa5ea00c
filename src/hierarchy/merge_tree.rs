//! Arena of agglomerative merge records.
//!
//! Cluster ids follow the SciPy/MATLAB convention:
//! - leaves: `0..n`
//! - merge `i` creates cluster `n + i`
//!
//! so the whole tree is a flat `Vec<Merge>` and a child lookup is an index.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single merge: two clusters joined at some distance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Merge {
    /// Lower id of the two merged clusters; drawn on the left.
    pub left: usize,
    /// Higher id of the two merged clusters.
    pub right: usize,
    /// Linkage distance at which the merge happened.
    pub distance: f64,
    /// Number of leaves in the resulting cluster.
    pub size: usize,
}

/// Merge history of `n` items: exactly `n - 1` merges once complete.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MergeTree {
    merges: Vec<Merge>,
    n_items: usize,
}

impl MergeTree {
    pub(crate) fn with_capacity(n_items: usize) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    pub(crate) fn push(&mut self, left: usize, right: usize, distance: f64, size: usize) {
        self.merges.push(Merge {
            left,
            right,
            distance,
            size,
        });
    }

    /// Rebuild a tree from externally produced merge records.
    ///
    /// Checks that there are `n_items - 1` merges, each joining two distinct
    /// clusters that already exist and have not been merged before, with a
    /// consistent size and a finite, non-negative distance.
    pub fn from_merges(n_items: usize, merges: Vec<Merge>) -> Result<Self> {
        if n_items == 0 {
            return Err(Error::EmptyInput);
        }
        if merges.len() != n_items - 1 {
            return Err(Error::DimensionMismatch {
                expected: n_items - 1,
                found: merges.len(),
            });
        }

        let mut sizes = vec![1usize; n_items];
        let mut used = vec![false; 2 * n_items - 1];
        for (i, m) in merges.iter().enumerate() {
            let created = n_items + i;
            let bad = |why: &str| Error::ShapeMismatch {
                expected: format!("merge {i}: {why}"),
                actual: format!("({}, {}, {}, {})", m.left, m.right, m.distance, m.size),
            };
            if m.left == m.right || m.left >= created || m.right >= created {
                return Err(bad("two distinct existing clusters"));
            }
            if used[m.left] || used[m.right] {
                return Err(bad("clusters not merged before"));
            }
            if !m.distance.is_finite() || m.distance < 0.0 {
                return Err(bad("finite non-negative distance"));
            }
            let size = sizes[m.left] + sizes[m.right];
            if size != m.size {
                return Err(bad("size equal to the sum of child sizes"));
            }
            used[m.left] = true;
            used[m.right] = true;
            sizes.push(size);
        }

        Ok(Self { merges, n_items })
    }

    /// Number of original items (leaves).
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Merge records in the order they happened.
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Merge distances, in merge order.
    pub fn distances(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.distance).collect()
    }

    /// Id of the cluster holding every leaf, once the tree is complete.
    pub fn root(&self) -> Option<usize> {
        match self.n_items {
            0 => None,
            1 => Some(0),
            n if self.merges.len() == n - 1 => Some(2 * n - 2),
            _ => None,
        }
    }

    /// Children of an internal cluster; `None` for leaves and unknown ids.
    pub fn children(&self, id: usize) -> Option<(usize, usize)> {
        let i = id.checked_sub(self.n_items)?;
        self.merges.get(i).map(|m| (m.left, m.right))
    }

    /// Number of leaves under a cluster id.
    pub fn cluster_size(&self, id: usize) -> Option<usize> {
        if id < self.n_items {
            return Some(1);
        }
        self.merges.get(id - self.n_items).map(|m| m.size)
    }

    /// Whether merge distances never decrease along the sequence.
    pub fn is_monotonic(&self) -> bool {
        self.merges
            .windows(2)
            .all(|pair| pair[1].distance >= pair[0].distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge(left: usize, right: usize, distance: f64, size: usize) -> Merge {
        Merge {
            left,
            right,
            distance,
            size,
        }
    }

    #[test]
    fn test_tree_navigation() {
        let tree = MergeTree::from_merges(
            4,
            vec![
                merge(0, 1, 0.5, 2),
                merge(2, 3, 0.7, 2),
                merge(4, 5, 1.0, 4),
            ],
        )
        .unwrap();

        assert_eq!(tree.n_merges(), 3);
        assert_eq!(tree.root(), Some(6));
        assert_eq!(tree.children(6), Some((4, 5)));
        assert_eq!(tree.children(4), Some((0, 1)));
        assert_eq!(tree.children(3), None);
        assert_eq!(tree.cluster_size(5), Some(2));
        assert_eq!(tree.cluster_size(2), Some(1));
        assert!(tree.is_monotonic());
        assert_eq!(tree.distances(), vec![0.5, 0.7, 1.0]);
    }

    #[test]
    fn test_from_merges_rejects_reuse() {
        let err = MergeTree::from_merges(3, vec![merge(0, 1, 0.5, 2), merge(0, 2, 0.9, 2)]);
        assert!(err.is_err());
    }

    #[test]
    fn test_from_merges_rejects_future_ids() {
        let err = MergeTree::from_merges(3, vec![merge(0, 3, 0.5, 2), merge(1, 2, 0.9, 2)]);
        assert!(err.is_err());
    }

    #[test]
    fn test_from_merges_rejects_wrong_size() {
        let err = MergeTree::from_merges(3, vec![merge(0, 1, 0.5, 2), merge(2, 3, 0.9, 2)]);
        assert!(err.is_err());
    }

    #[test]
    fn test_from_merges_rejects_wrong_count() {
        let err = MergeTree::from_merges(3, vec![merge(0, 1, 0.5, 2)]).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_single_leaf() {
        let tree = MergeTree::from_merges(1, vec![]).unwrap();
        assert_eq!(tree.root(), Some(0));
        assert!(tree.is_monotonic());
    }
}
