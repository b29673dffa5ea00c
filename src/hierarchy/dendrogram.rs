//! Reading a merge tree: leaf order and flat clusterings.
//!
//! A dendrogram draws every leaf once along the x-axis. Visiting the tree
//! depth-first and emitting the left subtree's leaves before the right
//! subtree's gives an ordering in which every cluster occupies a contiguous
//! run, so no two branches cross. The same ordering is used to reorder heatmap
//! rows.
//!
//! ```text
//!         6 (height=1.0)
//!        / \
//!       4   5 (height=0.7)
//!      / \ / \
//!     0  1 2  3   leaf order: [0, 1, 2, 3]
//! ```
//!
//! Cutting the tree turns it back into a flat clustering, either at a height
//! ([`MergeTree::cut_at_distance`]) or at a cluster count
//! ([`MergeTree::cut_to_k`]).

use super::merge_tree::MergeTree;
use crate::error::{Error, Result};

impl MergeTree {
    /// Leaves in left-to-right dendrogram order.
    ///
    /// For a complete tree this is a permutation of `0..n_items`. For a
    /// partial tree the remaining top-level clusters follow one another in
    /// increasing id order.
    pub fn leaf_order(&self) -> Vec<usize> {
        let n = self.n_items();
        let mut order = Vec::with_capacity(n);

        let mut tops: Vec<usize> = match self.root() {
            Some(root) => vec![root],
            None => self.top_clusters(),
        };
        // Stack pops from the back: push in reverse to emit left-to-right.
        tops.reverse();
        let mut stack = tops;

        while let Some(id) = stack.pop() {
            match self.children(id) {
                Some((left, right)) => {
                    stack.push(right);
                    stack.push(left);
                }
                None => order.push(id),
            }
        }
        order
    }

    /// Clusters not yet absorbed by a later merge, by increasing id.
    fn top_clusters(&self) -> Vec<usize> {
        let n = self.n_items();
        let mut absorbed = vec![false; n + self.n_merges()];
        for m in self.merges() {
            absorbed[m.left] = true;
            absorbed[m.right] = true;
        }
        (0..absorbed.len()).filter(|&id| !absorbed[id]).collect()
    }

    /// Flat labels from every merge with `distance <= threshold`.
    ///
    /// Labels are `0..n_clusters`, numbered by first appearance when scanning
    /// items in index order.
    pub fn cut_at_distance(&self, threshold: f64) -> Result<Vec<usize>> {
        if threshold.is_nan() || threshold < 0.0 {
            return Err(Error::InvalidThreshold(threshold));
        }
        let applied = self
            .merges()
            .iter()
            .enumerate()
            .filter(|(_, m)| m.distance <= threshold)
            .map(|(i, _)| i);
        Ok(self.labels_from(applied))
    }

    /// Flat labels for exactly `k` clusters: the first `n - k` merges applied.
    pub fn cut_to_k(&self, k: usize) -> Result<Vec<usize>> {
        let n = self.n_items();
        let reachable = n - self.n_merges();
        if k == 0 || k > n || k < reachable {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_items: n,
            });
        }
        Ok(self.labels_from(0..n - k))
    }

    fn labels_from(&self, applied: impl Iterator<Item = usize>) -> Vec<usize> {
        let n = self.n_items();
        let merges = self.merges();

        // Any leaf of a cluster stands in for the cluster in the union-find.
        let mut representative: Vec<usize> = (0..n).collect();
        for m in merges {
            representative.push(representative[m.left]);
        }

        let mut sets = UnionFind::new(n);
        for i in applied {
            let m = &merges[i];
            sets.union(representative[m.left], representative[m.right]);
        }

        let mut label_of_root = vec![usize::MAX; n];
        let mut next = 0;
        (0..n)
            .map(|item| {
                let root = sets.find(item);
                if label_of_root[root] == usize::MAX {
                    label_of_root[root] = next;
                    next += 1;
                }
                label_of_root[root]
            })
            .collect()
    }
}

#[derive(Clone, Debug)]
struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::Merge;

    fn four_leaf_tree() -> MergeTree {
        // ((0, 3), (1, 2)) with the pairs at different heights
        MergeTree::from_merges(
            4,
            vec![
                Merge {
                    left: 0,
                    right: 3,
                    distance: 0.5,
                    size: 2,
                },
                Merge {
                    left: 1,
                    right: 2,
                    distance: 0.7,
                    size: 2,
                },
                Merge {
                    left: 4,
                    right: 5,
                    distance: 3.0,
                    size: 4,
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_leaf_order_is_in_order_traversal() {
        assert_eq!(four_leaf_tree().leaf_order(), vec![0, 3, 1, 2]);
    }

    #[test]
    fn test_leaf_order_single_item() {
        let tree = MergeTree::from_merges(1, vec![]).unwrap();
        assert_eq!(tree.leaf_order(), vec![0]);
    }

    #[test]
    fn test_leaf_order_partial_tree() {
        let mut tree = MergeTree::with_capacity(3);
        tree.push(0, 2, 1.0, 2);
        assert_eq!(tree.leaf_order(), vec![1, 0, 2]);
    }

    #[test]
    fn test_cut_at_distance() {
        let tree = four_leaf_tree();
        assert_eq!(tree.cut_at_distance(0.0).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(tree.cut_at_distance(0.6).unwrap(), vec![0, 1, 2, 0]);
        assert_eq!(tree.cut_at_distance(1.0).unwrap(), vec![0, 1, 1, 0]);
        assert_eq!(tree.cut_at_distance(f64::INFINITY).unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_cut_at_distance_rejects_bad_threshold() {
        let tree = four_leaf_tree();
        assert_eq!(
            tree.cut_at_distance(-1.0).unwrap_err(),
            Error::InvalidThreshold(-1.0)
        );
        assert!(tree.cut_at_distance(f64::NAN).is_err());
    }

    #[test]
    fn test_cut_to_k() {
        let tree = four_leaf_tree();
        assert_eq!(tree.cut_to_k(4).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(tree.cut_to_k(2).unwrap(), vec![0, 1, 1, 0]);
        assert_eq!(tree.cut_to_k(1).unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_cut_to_k_out_of_range() {
        let tree = four_leaf_tree();
        for k in [0, 5] {
            assert_eq!(
                tree.cut_to_k(k).unwrap_err(),
                Error::InvalidClusterCount {
                    requested: k,
                    n_items: 4
                }
            );
        }
    }
}
