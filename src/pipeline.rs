//! From a count table to an ordered, grouped set of samples.
//!
//! ```text
//! counts (samples × categories)
//!   └─ NMF ─────────────► W (samples × k), H (k × categories)
//!        └─ row-normalize W ──► type proportions per sample
//! auxiliary (samples × indicators)
//!   └─ min-max scale ───► [0, 1] per indicator
//! proportions ⋈ scaled indicators (inner join on sample label)
//!   └─ Ward linkage ─────► merge tree ──► leaf order, flat clusters
//! ```
//!
//! Every input and parameter is checked before any numeric work starts, so a
//! failing run never leaves a half-built report behind.

use crate::cluster::build_linkage;
use crate::error::{Error, Result};
use crate::factorize::{
    component_labels, top_features, ComponentProfile, Convergence, Nmf, NmfConfig,
};
use crate::hierarchy::MergeTree;
use crate::matrix::{check_finite, LabeledMatrix};
use crate::preprocess::{normalize_labeled_rows, MinMaxScaler};
use ndarray::Axis;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How to flatten the merge tree into clusters, if at all.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Cut {
    /// Exactly this many clusters.
    Clusters(usize),
    /// Apply merges up to this linkage distance.
    Distance(f64),
}

/// Settings for a full run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypologyConfig {
    /// Factorization settings.
    pub nmf: NmfConfig,
    /// Optional flat cut of the merge tree.
    pub cut: Option<Cut>,
}

/// Everything a run produces, labeled for reporting and rendering.
#[derive(Debug, Clone)]
pub struct TypologyReport {
    /// Row-normalized W: every sample's proportions over `Type 1 ..= Type k`.
    pub mixture: LabeledMatrix,
    /// H: every type's weights over the original categories.
    pub basis: LabeledMatrix,
    /// Clustered feature matrix: proportions joined with scaled indicators.
    pub features: LabeledMatrix,
    /// Ward merge tree over the rows of `features`.
    pub tree: MergeTree,
    /// Rows of `features` in dendrogram order.
    pub leaf_order: Vec<usize>,
    /// Flat cluster label per row of `features`, when a cut was requested.
    pub clusters: Option<Vec<usize>>,
    /// Factorization stopping status.
    pub status: Convergence,
    /// `‖X − W·H‖_F` of the unnormalized factors.
    pub reconstruction_err: f64,
}

impl TypologyReport {
    /// Sample labels in dendrogram order.
    pub fn ordered_labels(&self) -> Vec<&str> {
        let labels = self.features.row_labels();
        self.leaf_order.iter().map(|&i| labels[i].as_str()).collect()
    }

    /// Feature matrix with rows reordered for a heatmap.
    pub fn ordered_features(&self) -> Result<LabeledMatrix> {
        let labels = self.features.row_labels();
        let ordered: Vec<String> = self.leaf_order.iter().map(|&i| labels[i].clone()).collect();
        self.features.select_rows(&ordered)
    }

    /// The `top_n` heaviest categories of each type.
    pub fn component_profiles(&self, top_n: usize) -> Result<Vec<ComponentProfile>> {
        top_features(&self.basis, top_n)
    }

    /// Sample labels grouped by flat cluster, in leaf order within each cluster.
    pub fn cluster_members(&self) -> Option<Vec<Vec<&str>>> {
        let clusters = self.clusters.as_ref()?;
        let n_clusters = clusters.iter().max().map_or(0, |&c| c + 1);
        let labels = self.features.row_labels();
        let mut groups = vec![Vec::new(); n_clusters];
        for &i in &self.leaf_order {
            groups[clusters[i]].push(labels[i].as_str());
        }
        Some(groups)
    }
}

/// The full counts-to-clusters run.
#[derive(Debug, Clone, Default)]
pub struct Typology {
    config: TypologyConfig,
}

impl Typology {
    /// Run with `k` latent types and default settings otherwise.
    pub fn new(k: usize) -> Self {
        Self {
            config: TypologyConfig {
                nmf: NmfConfig {
                    k,
                    ..NmfConfig::default()
                },
                cut: None,
            },
        }
    }

    /// Run from an explicit configuration.
    pub fn with_config(config: TypologyConfig) -> Self {
        Self { config }
    }

    /// Request a flat cut of the tree.
    pub fn with_cut(mut self, cut: Cut) -> Self {
        self.config.cut = Some(cut);
        self
    }

    /// Replace the factorization settings.
    pub fn with_nmf(mut self, nmf: NmfConfig) -> Self {
        self.config.nmf = nmf;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &TypologyConfig {
        &self.config
    }

    /// Factorize `counts`, join the type proportions with the scaled
    /// `auxiliary` columns, and cluster the samples present in both.
    pub fn run(
        &self,
        counts: &LabeledMatrix,
        auxiliary: Option<&LabeledMatrix>,
    ) -> Result<TypologyReport> {
        let nmf = Nmf::with_config(self.config.nmf.clone());
        let rows = self.validate(&nmf, counts, auxiliary)?;

        let factors = nmf.factorize_labeled(counts)?;
        let mixture = normalize_labeled_rows(&factors.mixture)?;

        let features = match auxiliary {
            Some(aux) => {
                let scaled = MinMaxScaler::scale_labeled(&aux.select_rows(&rows)?)?;
                mixture.inner_join(&scaled)?
            }
            None => mixture.clone(),
        };

        let tree = build_linkage(features.values().view())?;
        let leaf_order = tree.leaf_order();
        let clusters = match self.config.cut {
            Some(Cut::Clusters(k)) => Some(tree.cut_to_k(k)?),
            Some(Cut::Distance(t)) => Some(tree.cut_at_distance(t)?),
            None => None,
        };

        log::debug!(
            "typology: {} samples clustered on {} features ({} types)",
            features.nrows(),
            features.ncols(),
            self.config.nmf.k
        );

        Ok(TypologyReport {
            mixture,
            basis: factors.basis,
            features,
            tree,
            leaf_order,
            clusters,
            status: factors.fit.status,
            reconstruction_err: factors.fit.reconstruction_err(),
        })
    }

    /// Check inputs and settings; returns the labels of the rows to cluster.
    fn validate(
        &self,
        nmf: &Nmf,
        counts: &LabeledMatrix,
        auxiliary: Option<&LabeledMatrix>,
    ) -> Result<Vec<String>> {
        nmf.validate(counts.values().view())?;

        // An all-zero sample gets an all-zero mixture row.
        let sums = counts.values().sum_axis(Axis(1));
        if let Some(row) = sums.iter().position(|&s| s <= 0.0) {
            return Err(Error::DegenerateRow { row });
        }

        let rows = match auxiliary {
            Some(aux) => {
                check_finite(aux.values().view())?;
                let types = component_labels(self.config.nmf.k);
                if let Some(clash) = aux.col_labels().iter().find(|c| types.contains(*c)) {
                    return Err(Error::DuplicateLabel(clash.clone()));
                }
                counts.shared_rows(aux)
            }
            None => counts.row_labels().to_vec(),
        };

        let n = rows.len();
        if n < 2 {
            return Err(Error::invalid_parameter(
                "n_samples",
                format!("clustering needs at least 2 samples present in every input, got {n}"),
            ));
        }

        match self.config.cut {
            Some(Cut::Clusters(k)) if k == 0 || k > n => Err(Error::InvalidClusterCount {
                requested: k,
                n_items: n,
            }),
            Some(Cut::Distance(t)) if t.is_nan() || t < 0.0 => Err(Error::InvalidThreshold(t)),
            _ => Ok(rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use ndarray::array;

    fn labels(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    fn counts() -> LabeledMatrix {
        LabeledMatrix::new(
            labels("country", 6),
            labels("category", 4),
            array![
                [9.0, 8.0, 0.0, 1.0],
                [8.0, 9.0, 1.0, 0.0],
                [7.0, 9.0, 0.0, 0.0],
                [0.0, 1.0, 9.0, 8.0],
                [1.0, 0.0, 8.0, 9.0],
                [0.0, 0.0, 9.0, 7.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_run_without_auxiliary() {
        let report = Typology::new(2)
            .with_cut(Cut::Clusters(2))
            .run(&counts(), None)
            .unwrap();

        assert_eq!(report.features.nrows(), 6);
        assert_eq!(report.tree.n_merges(), 5);
        let clusters = report.clusters.as_ref().unwrap();
        assert_eq!(clusters[0], clusters[1]);
        assert_eq!(clusters[1], clusters[2]);
        assert_eq!(clusters[3], clusters[4]);
        assert_eq!(clusters[4], clusters[5]);
        assert_ne!(clusters[0], clusters[3]);

        for row in report.mixture.values().rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_run_joins_auxiliary() {
        let aux = LabeledMatrix::new(
            vec!["country5".into(), "country0".into(), "country2".into(), "elsewhere".into()],
            vec!["gdp_per_capita".into(), "mean_lat".into()],
            array![[1000.0, 10.0], [3000.0, 50.0], [2000.0, 30.0], [99.0, 0.0]],
        )
        .unwrap();

        let report = Typology::new(2).run(&counts(), Some(&aux)).unwrap();
        assert_eq!(
            report.features.row_labels(),
            &["country0", "country2", "country5"]
        );
        assert_eq!(
            report.features.col_labels(),
            &["Type 1", "Type 2", "gdp_per_capita", "mean_lat"]
        );
        // scaled over the joined samples only
        assert_eq!(report.features.get("country0", "gdp_per_capita"), Some(1.0));
        assert_eq!(report.features.get("country5", "mean_lat"), Some(0.0));
        assert_eq!(report.features.get("country2", "mean_lat"), Some(0.5));

        let mut order = report.leaf_order.clone();
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(report.ordered_labels().len(), 3);
        assert!(report.clusters.is_none());
        assert!(report.cluster_members().is_none());
    }

    #[test]
    fn test_fail_fast_on_zero_sample() {
        let mut x = counts().values().clone();
        x.row_mut(2).fill(0.0);
        let zeroed = counts().with_values(x).unwrap();
        let err = Typology::new(2).run(&zeroed, None).unwrap_err();
        assert_eq!(err, Error::DegenerateRow { row: 2 });
    }

    #[test]
    fn test_fail_fast_on_bad_cut() {
        let err = Typology::new(2)
            .with_cut(Cut::Clusters(7))
            .run(&counts(), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidThreshold);

        let err = Typology::new(2)
            .with_cut(Cut::Distance(-0.5))
            .run(&counts(), None)
            .unwrap_err();
        assert_eq!(err, Error::InvalidThreshold(-0.5));
    }

    #[test]
    fn test_too_few_joined_samples() {
        let aux = LabeledMatrix::from_column(vec!["country1".into()], "gdp", &[1.0]).unwrap();
        let err = Typology::new(2).run(&counts(), Some(&aux)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_auxiliary_column_clash() {
        let aux = LabeledMatrix::from_column(labels("country", 6), "Type 1", &[1.0; 6]).unwrap();
        let err = Typology::new(2).run(&counts(), Some(&aux)).unwrap_err();
        assert_eq!(err, Error::DuplicateLabel("Type 1".into()));
    }

    #[test]
    fn test_report_helpers() {
        let report = Typology::new(2)
            .with_cut(Cut::Clusters(2))
            .run(&counts(), None)
            .unwrap();

        let ordered = report.ordered_features().unwrap();
        assert_eq!(
            ordered.row_labels().iter().map(String::as_str).collect::<Vec<_>>(),
            report.ordered_labels()
        );

        let members = report.cluster_members().unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members.iter().map(Vec::len).sum::<usize>(), 6);

        let profiles = report.component_profiles(2).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].features.len(), 2);
    }
}
