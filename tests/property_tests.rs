use proptest::prelude::*;
use typology::matrix::to_array;
use typology::{build_linkage, normalize_rows, MinMaxScaler, Nmf};

fn table(
    rows: std::ops::Range<usize>,
    cols: std::ops::Range<usize>,
    values: std::ops::Range<f64>,
) -> impl Strategy<Value = Vec<Vec<f64>>> {
    (rows, cols).prop_flat_map(move |(n, m)| {
        prop::collection::vec(prop::collection::vec(values.clone(), m), n)
    })
}

proptest! {
    #[test]
    fn prop_nmf_factors_non_negative_and_objective_falls(
        data in table(2..8, 2..6, 0.0f64..10.0),
        k in 1usize..4,
        seed in 0u64..1000
    ) {
        let x = to_array(&data).unwrap();
        let k = k.min(x.nrows()).min(x.ncols());
        let fit = Nmf::new(k)
            .with_seed(seed)
            .with_max_iter(40)
            .with_tol(0.0)
            .factorize(x.view())
            .unwrap();

        prop_assert_eq!(fit.w.dim(), (x.nrows(), k));
        prop_assert_eq!(fit.h.dim(), (k, x.ncols()));
        prop_assert!(fit.w.iter().chain(fit.h.iter()).all(|&v| v >= 0.0 && v.is_finite()));
        for pair in fit.objective_history.windows(2) {
            prop_assert!(pair[1] <= pair[0] * (1.0 + 1e-9) + 1e-9);
        }
    }

    #[test]
    fn prop_normalized_rows_sum_to_one(
        data in table(1..10, 1..6, 0.01f64..100.0)
    ) {
        let x = to_array(&data).unwrap();
        let p = normalize_rows(x.view()).unwrap();
        for row in p.rows() {
            prop_assert!((row.sum() - 1.0).abs() < 1e-9);
            prop_assert!(row.iter().all(|&v| v > 0.0));
        }
    }

    #[test]
    fn prop_minmax_stays_in_unit_interval(
        data in table(1..10, 1..5, -50.0f64..50.0)
    ) {
        let x = to_array(&data).unwrap();
        let scaled = MinMaxScaler::fit_transform(x.view()).unwrap();
        prop_assert!(scaled.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn prop_linkage_is_complete_and_monotone(
        data in table(2..25, 1..4, -100.0f64..100.0)
    ) {
        let x = to_array(&data).unwrap();
        let n = x.nrows();
        let tree = build_linkage(x.view()).unwrap();

        prop_assert_eq!(tree.n_merges(), n - 1);
        prop_assert_eq!(tree.merges()[n - 2].size, n);
        for pair in tree.merges().windows(2) {
            prop_assert!(pair[1].distance >= pair[0].distance - 1e-9 * (1.0 + pair[0].distance));
        }

        let mut order = tree.leaf_order();
        order.sort_unstable();
        prop_assert_eq!(order, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn prop_cut_to_k_yields_k_clusters(
        data in table(2..20, 1..3, -10.0f64..10.0),
        k in 1usize..20
    ) {
        let x = to_array(&data).unwrap();
        let n = x.nrows();
        if k <= n {
            let tree = build_linkage(x.view()).unwrap();
            let labels = tree.cut_to_k(k).unwrap();

            prop_assert_eq!(labels.len(), n);
            prop_assert_eq!(labels[0], 0);
            let distinct: std::collections::BTreeSet<_> = labels.iter().copied().collect();
            prop_assert_eq!(distinct.len(), k);
            prop_assert!(labels.iter().all(|&l| l < k));
        }
    }
}
