//! Starting points for the multiplicative updates.
//!
//! Multiplicative updates can never move an entry away from exactly zero, so
//! both strategies below return strictly positive factors whenever `X` has
//! any mass.
//!
//! ## Random
//!
//! Entries drawn as `a * |N(0, 1)|` with `a = sqrt(mean(X) / k)`, so that the
//! initial product `W·H` has roughly the scale of `X`.
//!
//! ## Structured (NNDSVD, Boutsidis & Gallopoulos 2008)
//!
//! From the thin SVD `X = U Σ Vᵀ`:
//!
//! 1. The leading pair is taken in absolute value (Perron vectors of a
//!    non-negative matrix share one sign): `W₀ = √σ₀ |u₀|`, `H₀ = √σ₀ |v₀|`.
//! 2. For every other pair, split `u` and `v` into positive and negative parts
//!    and keep whichever signed product `‖u₊‖‖v₊‖` or `‖u₋‖‖v₋‖` is larger,
//!    scaled by `√(σ · that product)`.
//! 3. Entries below `1e-6` are zeroed, then every zero is filled with
//!    `mean(X)`, so no component is locked at zero.

use ndarray::{Array1, Array2, ArrayView2};
use rand::prelude::*;
use rand_distr::StandardNormal;

const ZERO_CUTOFF: f64 = 1e-6;

/// Random non-negative factors, reproducible for a given seed.
pub(crate) fn random(x: ArrayView2<'_, f64>, k: usize, seed: u64) -> (Array2<f64>, Array2<f64>) {
    let (n, m) = x.dim();
    let scale = (x.mean().unwrap_or(0.0) / k as f64).sqrt();
    let mut rng = StdRng::seed_from_u64(seed);

    let h = Array2::from_shape_simple_fn((k, m), || {
        scale * rng.sample::<f64, _>(StandardNormal).abs()
    });
    let w = Array2::from_shape_simple_fn((n, k), || {
        scale * rng.sample::<f64, _>(StandardNormal).abs()
    });
    (w, h)
}

/// Deterministic SVD-seeded factors (NNDSVD with mean fill).
pub(crate) fn structured(x: ArrayView2<'_, f64>, k: usize) -> (Array2<f64>, Array2<f64>) {
    let (n, m) = x.dim();
    let (u, sigma, v) = leading_singular_triplets(x, k);

    let mut w = Array2::<f64>::zeros((n, k));
    let mut h = Array2::<f64>::zeros((k, m));

    let root = sigma[0].max(0.0).sqrt();
    for i in 0..n {
        w[[i, 0]] = root * u[[i, 0]].abs();
    }
    for j in 0..m {
        h[[0, j]] = root * v[[j, 0]].abs();
    }

    for c in 1..k {
        let x_pos: Array1<f64> = u.column(c).mapv(|a| a.max(0.0));
        let x_neg: Array1<f64> = u.column(c).mapv(|a| (-a).max(0.0));
        let y_pos: Array1<f64> = v.column(c).mapv(|a| a.max(0.0));
        let y_neg: Array1<f64> = v.column(c).mapv(|a| (-a).max(0.0));

        let (xp_norm, yp_norm) = (norm(&x_pos), norm(&y_pos));
        let (xn_norm, yn_norm) = (norm(&x_neg), norm(&y_neg));
        let (m_pos, m_neg) = (xp_norm * yp_norm, xn_norm * yn_norm);

        let (uu, vv, mass, xn, yn) = if m_pos > m_neg {
            (x_pos, y_pos, m_pos, xp_norm, yp_norm)
        } else {
            (x_neg, y_neg, m_neg, xn_norm, yn_norm)
        };
        if mass <= 0.0 {
            continue;
        }

        let lambda = (sigma[c].max(0.0) * mass).sqrt();
        for i in 0..n {
            w[[i, c]] = lambda * uu[i] / xn;
        }
        for j in 0..m {
            h[[c, j]] = lambda * vv[j] / yn;
        }
    }

    let fill = x.mean().unwrap_or(0.0);
    let patch = |a: f64| if a < ZERO_CUTOFF { fill } else { a };
    w.mapv_inplace(patch);
    h.mapv_inplace(patch);
    (w, h)
}

fn norm(a: &Array1<f64>) -> f64 {
    a.dot(a).sqrt()
}

/// First `k` singular triplets of `x`, ordered by decreasing singular value.
///
/// Returns `U` (n × k), `σ` (k), and `V` (m × k).
fn leading_singular_triplets(
    x: ArrayView2<'_, f64>,
    k: usize,
) -> (Array2<f64>, Vec<f64>, Array2<f64>) {
    let (n, m) = x.dim();
    let mat = faer::Mat::<f64>::from_fn(n, m, |i, j| x[[i, j]]);
    let svd = mat.thin_svd();
    let s = svd.s_diagonal();
    let u_full = svd.u();
    let v_full = svd.v();

    let r = n.min(m);
    let mut order: Vec<usize> = (0..r).collect();
    order.sort_by(|&a, &b| s.read(b).total_cmp(&s.read(a)));
    order.truncate(k);

    let u = Array2::from_shape_fn((n, order.len()), |(i, c)| u_full.read(i, order[c]));
    let v = Array2::from_shape_fn((m, order.len()), |(j, c)| v_full.read(j, order[c]));
    let sigma = order.iter().map(|&c| s.read(c)).collect();
    (u, sigma, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample() -> Array2<f64> {
        array![
            [5.0, 3.0, 0.0, 1.0],
            [4.0, 0.0, 0.0, 1.0],
            [1.0, 1.0, 0.0, 5.0],
            [1.0, 0.0, 0.0, 4.0],
            [0.0, 1.0, 5.0, 4.0],
        ]
    }

    #[test]
    fn test_random_is_seeded() {
        let x = sample();
        let (w1, h1) = random(x.view(), 2, 7);
        let (w2, h2) = random(x.view(), 2, 7);
        let (w3, _) = random(x.view(), 2, 8);
        assert_eq!(w1, w2);
        assert_eq!(h1, h2);
        assert_ne!(w1, w3);
        assert_eq!(w1.dim(), (5, 2));
        assert_eq!(h1.dim(), (2, 4));
        assert!(w1.iter().chain(h1.iter()).all(|&a| a >= 0.0));
    }

    #[test]
    fn test_structured_is_positive_and_deterministic() {
        let x = sample();
        let (w1, h1) = structured(x.view(), 3);
        let (w2, h2) = structured(x.view(), 3);
        assert_eq!(w1, w2);
        assert_eq!(h1, h2);
        assert_eq!(w1.dim(), (5, 3));
        assert_eq!(h1.dim(), (3, 4));
        assert!(w1.iter().chain(h1.iter()).all(|&a| a > 0.0));
    }

    #[test]
    fn test_structured_rank_one_is_exact() {
        // outer product of positive vectors: leading triplet reproduces it
        let x = array![[1.0, 2.0, 3.0], [2.0, 4.0, 6.0]];
        let (w, h) = structured(x.view(), 1);
        let approx = w.dot(&h);
        for (a, b) in approx.iter().zip(x.iter()) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }
}
