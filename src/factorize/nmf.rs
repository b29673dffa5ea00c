//! Multiplicative-update NMF (Lee & Seung, 2001).
//!
//! Minimizes the squared Frobenius objective
//!
//! ```text
//! f(W, H) = ‖X − W·H‖²_F     subject to W ≥ 0, H ≥ 0
//! ```
//!
//! by alternating the two classic updates, each a rescaling of the current
//! factor by a ratio of non-negative terms:
//!
//! ```text
//! H ← H ∘ (Wᵀ X) ⊘ (Wᵀ W H + ε)
//! W ← W ∘ (X Hᵀ) ⊘ (W H Hᵀ + ε)
//! ```
//!
//! With `ε = 1e-10` neither denominator can vanish, every factor stays
//! non-negative, and `f` does not increase from one iteration to the next.
//!
//! The updates run on `X / max(X)` and `W` is scaled back afterwards, so `ε`
//! is relative to the data: multiplying `X` by a constant multiplies `W` by
//! the same constant and, up to rounding, leaves the iteration count unchanged.
//!
//! # Stopping
//!
//! The loop stops once the relative decrease `(f_{t-1} − f_t) / f_{t-1}`
//! drops below `tol`, or after `max_iter` iterations. Running out of
//! iterations is not an error: the best iterate is returned with
//! [`Convergence::MaxIterReached`] so the caller can decide whether to retry
//! with more iterations, another seed, or another `k`.

use super::init;
use crate::error::{Error, Result};
use crate::matrix::{check_non_negative, LabeledMatrix};
use ndarray::{Array2, ArrayView2, Zip};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Added to every update denominator, in units of `max(X)`.
const DENOMINATOR_FLOOR: f64 = 1e-10;

/// How the factors are seeded before the first update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InitStrategy {
    /// Scaled half-normal draws from a seeded generator.
    Random,
    /// NNDSVD: deterministic seed from the leading singular vectors of X.
    #[default]
    Structured,
}

/// Parameters of one factorization run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NmfConfig {
    /// Number of latent components; `1 <= k <= min(n_samples, n_features)`.
    pub k: usize,
    /// Initialization method.
    pub init: InitStrategy,
    /// Generator seed, read only by [`InitStrategy::Random`].
    pub seed: u64,
    /// Iteration cap (at least 1).
    pub max_iter: usize,
    /// Relative-decrease threshold on the objective.
    pub tol: f64,
}

impl Default for NmfConfig {
    fn default() -> Self {
        Self {
            k: 4,
            init: InitStrategy::Structured,
            seed: 0,
            max_iter: 200,
            tol: 1e-4,
        }
    }
}

impl NmfConfig {
    /// Check everything that does not depend on the data.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::invalid_parameter("k", "must be at least 1"));
        }
        if self.max_iter == 0 {
            return Err(Error::invalid_parameter("max_iter", "must be at least 1"));
        }
        if !self.tol.is_finite() || self.tol < 0.0 {
            return Err(Error::invalid_parameter(
                "tol",
                format!("must be finite and non-negative, got {}", self.tol),
            ));
        }
        Ok(())
    }
}

/// Outcome of the iteration loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Convergence {
    /// Relative decrease fell below `tol` after this many iterations.
    Converged {
        /// Iterations run.
        iterations: usize,
    },
    /// `max_iter` was exhausted first.
    MaxIterReached {
        /// Iterations run (equal to `max_iter`).
        iterations: usize,
    },
}

impl Convergence {
    /// Whether the tolerance was met.
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }

    /// Iterations run.
    pub fn iterations(&self) -> usize {
        match *self {
            Convergence::Converged { iterations } | Convergence::MaxIterReached { iterations } => {
                iterations
            }
        }
    }
}

/// Factors and diagnostics of a factorization.
#[derive(Debug, Clone)]
pub struct NmfFit {
    /// Mixture matrix, n_samples × k.
    pub w: Array2<f64>,
    /// Basis matrix, k × n_features.
    pub h: Array2<f64>,
    /// Whether and when the loop stopped.
    pub status: Convergence,
    /// Objective after initialization (entry 0) and after every iteration.
    pub objective_history: Vec<f64>,
}

impl NmfFit {
    /// Squared Frobenius error of the returned factors.
    pub fn objective(&self) -> f64 {
        self.objective_history
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    /// `‖X − W·H‖_F`.
    pub fn reconstruction_err(&self) -> f64 {
        self.objective().sqrt()
    }

    /// `W·H`.
    pub fn reconstruct(&self) -> Array2<f64> {
        self.w.dot(&self.h)
    }

    /// Whether the tolerance was met before `max_iter`.
    pub fn converged(&self) -> bool {
        self.status.is_converged()
    }

    /// Iterations run.
    pub fn n_iter(&self) -> usize {
        self.status.iterations()
    }
}

/// Labeled view of a fit: sample × type mixtures and type × feature basis.
#[derive(Debug, Clone)]
pub struct LabeledFactors {
    /// W with sample rows and `Type i` columns.
    pub mixture: LabeledMatrix,
    /// H with `Type i` rows and feature columns.
    pub basis: LabeledMatrix,
    /// The unlabeled fit, including diagnostics.
    pub fit: NmfFit,
}

/// Non-negative matrix factorization solver.
#[derive(Debug, Clone, Default)]
pub struct Nmf {
    config: NmfConfig,
}

impl Nmf {
    /// Solver for `k` components with default settings.
    pub fn new(k: usize) -> Self {
        Self {
            config: NmfConfig {
                k,
                ..NmfConfig::default()
            },
        }
    }

    /// Solver from an explicit configuration.
    pub fn with_config(config: NmfConfig) -> Self {
        Self { config }
    }

    /// Set initialization strategy.
    pub fn with_init(mut self, init: InitStrategy) -> Self {
        self.config.init = init;
        self
    }

    /// Set random seed (used by [`InitStrategy::Random`] only).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.config.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.config.tol = tol;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &NmfConfig {
        &self.config
    }

    /// Factorize `x` (rows = samples, columns = features).
    pub fn factorize(&self, x: ArrayView2<'_, f64>) -> Result<NmfFit> {
        self.validate(x)?;
        let cfg = &self.config;
        let (n, m) = x.dim();
        log::debug!(
            "nmf: {n}x{m}, k={}, init={:?}, max_iter={}, tol={}",
            cfg.k,
            cfg.init,
            cfg.max_iter,
            cfg.tol
        );

        let scale = x.fold(0.0_f64, |acc, &v| acc.max(v));
        let scale = if scale > 0.0 { scale } else { 1.0 };
        let unit = scale * scale;
        let normalized = x.mapv(|v| v / scale);
        let x = normalized.view();

        let (mut w, mut h) = match cfg.init {
            InitStrategy::Random => init::random(x, cfg.k, cfg.seed),
            InitStrategy::Structured => init::structured(x, cfg.k),
        };

        let mut objective = frobenius_sq(x, &w, &h);
        let mut history = Vec::with_capacity(cfg.max_iter + 1);
        history.push(objective);
        let mut best = (objective, w.clone(), h.clone());
        let mut status = Convergence::MaxIterReached {
            iterations: cfg.max_iter,
        };

        if objective == 0.0 {
            status = Convergence::Converged { iterations: 0 };
        } else {
            for iter in 1..=cfg.max_iter {
                update_h(x, &w, &mut h);
                update_w(x, &mut w, &h);

                let next = frobenius_sq(x, &w, &h);
                history.push(next);
                if next <= best.0 {
                    best = (next, w.clone(), h.clone());
                }

                let decrease = if objective > 0.0 {
                    (objective - next) / objective
                } else {
                    0.0
                };
                log::trace!(
                    "nmf iter {iter}: objective={:.6e}, rel_decrease={decrease:.3e}",
                    next * unit
                );
                objective = next;

                if decrease < cfg.tol {
                    status = Convergence::Converged { iterations: iter };
                    break;
                }
            }
        }

        if status.is_converged() {
            log::debug!(
                "nmf: converged after {} iterations, objective={:.6e}",
                status.iterations(),
                best.0 * unit
            );
        } else {
            log::warn!(
                "nmf: no convergence within {} iterations (objective={:.6e}, tol={})",
                cfg.max_iter,
                best.0 * unit,
                cfg.tol
            );
        }

        let (_, mut w, h) = best;
        w.mapv_inplace(|v| v * scale);
        history.iter_mut().for_each(|f| *f *= unit);
        Ok(NmfFit {
            w,
            h,
            status,
            objective_history: history,
        })
    }

    /// Factorize a labeled matrix; components are labeled `Type 1 ..= Type k`.
    pub fn factorize_labeled(&self, x: &LabeledMatrix) -> Result<LabeledFactors> {
        let fit = self.factorize(x.values().view())?;
        let types = component_labels(self.config.k);
        let mixture = LabeledMatrix::new(x.row_labels().to_vec(), types.clone(), fit.w.clone())?;
        let basis = LabeledMatrix::new(types, x.col_labels().to_vec(), fit.h.clone())?;
        Ok(LabeledFactors {
            mixture,
            basis,
            fit,
        })
    }

    /// Fail-fast validation of data and configuration together.
    pub fn validate(&self, x: ArrayView2<'_, f64>) -> Result<()> {
        check_non_negative(x)?;
        self.config.validate()?;
        let limit = x.nrows().min(x.ncols());
        if self.config.k > limit {
            return Err(Error::invalid_parameter(
                "k",
                format!(
                    "{} exceeds min(n_samples, n_features) = {limit}",
                    self.config.k
                ),
            ));
        }
        Ok(())
    }
}

/// One-shot factorization with an explicit configuration.
pub fn factorize(x: ArrayView2<'_, f64>, config: &NmfConfig) -> Result<NmfFit> {
    Nmf::with_config(config.clone()).factorize(x)
}

/// `Type 1`, `Type 2`, ... for `k` components.
pub fn component_labels(k: usize) -> Vec<String> {
    (1..=k).map(|i| format!("Type {i}")).collect()
}

/// `‖X − W·H‖²_F`.
pub(crate) fn frobenius_sq(x: ArrayView2<'_, f64>, w: &Array2<f64>, h: &Array2<f64>) -> f64 {
    let approx = w.dot(h);
    Zip::from(&x)
        .and(&approx)
        .fold(0.0, |acc, &a, &b| acc + (a - b) * (a - b))
}

fn update_h(x: ArrayView2<'_, f64>, w: &Array2<f64>, h: &mut Array2<f64>) {
    let numer = w.t().dot(&x);
    let denom = w.t().dot(w).dot(&*h);
    rescale(h, &numer, &denom);
}

fn update_w(x: ArrayView2<'_, f64>, w: &mut Array2<f64>, h: &Array2<f64>) {
    let numer = x.dot(&h.t());
    let denom = w.dot(&h.dot(&h.t()));
    rescale(w, &numer, &denom);
}

/// `factor ← factor ∘ numer ⊘ (denom + ε)`. Inputs are fixed before the
/// update starts, so the parallel and serial paths give identical results.
fn rescale(factor: &mut Array2<f64>, numer: &Array2<f64>, denom: &Array2<f64>) {
    let zip = Zip::from(factor).and(numer).and(denom);

    #[cfg(feature = "parallel")]
    zip.par_for_each(|f, &num, &den| *f *= num / (den + DENOMINATOR_FLOOR));

    #[cfg(not(feature = "parallel"))]
    zip.for_each(|f, &num, &den| *f *= num / (den + DENOMINATOR_FLOOR));
}
