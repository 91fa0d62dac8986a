//! Independent-source decomposition (FastICA).

use eventca_math::{
    DEFAULT_EIGEN_SWEEPS, DEFAULT_EIGEN_TOLERANCE, covariance, inverse_sqrt, pseudo_inverse,
    symmetric_eigen,
};
use eventca_primitives::ComponentMethod;
use eventca_traits::{Decomposed, Decomposition, DecompositionError, Diagnostics};
use ndarray::{Array2, Axis, s};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::{
    IndependentConfig,
    config::{check_components, math_error},
};

/// Eigenvalues below this fraction of the largest cannot be whitened.
const WHITENING_FLOOR: f64 = 1e-10;

/// FastICA with the `logcosh` contrast and symmetric decorrelation.
///
/// The data is centered and whitened onto its top `k` principal directions,
/// then all `k` unmixing vectors are updated in parallel by the fixed-point
/// rule and re-orthogonalized with `W ← (WWᵀ)^{-1/2} W`. Recovered sources
/// are rescaled to unit standard deviation.
#[derive(Debug, Clone, Default)]
pub struct IndependentDecomposer {
    config: IndependentConfig,
}

impl IndependentDecomposer {
    /// Create a new decomposer with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(IndependentConfig::default())
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &IndependentConfig {
        &self.config
    }

    /// Whitening matrix (`k x p`) with `whitened = centered · Kᵀ` having identity covariance.
    fn whitening(&self, data: &Array2<f64>) -> Result<Array2<f64>, DecompositionError> {
        let k = self.config.n_components;
        let method = self.method();

        let cov = covariance(data, 0).map_err(|e| math_error(method, e))?;
        let eigen = symmetric_eigen(&cov, DEFAULT_EIGEN_SWEEPS, DEFAULT_EIGEN_TOLERANCE)
            .map_err(|e| math_error(method, e))?;

        let floor = WHITENING_FLOOR * eigen.eigenvalues[0].max(0.0);
        let smallest = eigen.eigenvalues[k - 1];
        if smallest <= floor {
            return Err(DecompositionError::InvalidParameter(format!(
                "data has fewer than {k} independent directions (eigenvalue {smallest:e})"
            )));
        }

        let mut whitening = eigen.eigenvectors.slice(s![.., ..k]).t().to_owned();
        for (mut row, &l) in whitening.rows_mut().into_iter().zip(&eigen.eigenvalues) {
            row /= l.sqrt();
        }
        Ok(whitening)
    }

    /// Parallel fixed-point iteration on whitened data (`n x k`).
    ///
    /// Returns the orthogonal unmixing matrix and the iteration it converged on.
    fn unmix(&self, whitened: &Array2<f64>) -> Result<(Array2<f64>, usize), DecompositionError> {
        let k = self.config.n_components;
        let n = whitened.nrows() as f64;

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let initial: Array2<f64> =
            Array2::from_shape_fn((k, k), |_| StandardNormal.sample(&mut rng));
        let mut unmixing = symmetric_decorrelation(&initial)?;

        for iteration in 1..=self.config.max_iter {
            let g = whitened.dot(&unmixing.t()).mapv(f64::tanh);
            let g_prime = g.mapv(|v| 1.0 - v * v).sum_axis(Axis(0)) / n;

            let mut update = g.t().dot(whitened) / n;
            update -= &(&unmixing * &g_prime.insert_axis(Axis(1)));
            let update = symmetric_decorrelation(&update)?;

            let lim = update
                .dot(&unmixing.t())
                .diag()
                .iter()
                .fold(0.0_f64, |acc, d| acc.max((d.abs() - 1.0).abs()));
            unmixing = update;

            if lim < self.config.tol {
                return Ok((unmixing, iteration));
            }
        }

        Err(DecompositionError::NonConvergence {
            method: self.method(),
            iterations: self.config.max_iter,
        })
    }
}

/// `(WWᵀ)^{-1/2} W`, the closest orthogonal matrix to `W`.
fn symmetric_decorrelation(w: &Array2<f64>) -> Result<Array2<f64>, DecompositionError> {
    let gram = w.dot(&w.t());
    let inv_sqrt =
        inverse_sqrt(&gram).map_err(|e| math_error(ComponentMethod::IndependentSource, e))?;
    Ok(inv_sqrt.dot(w))
}

impl Decomposition for IndependentDecomposer {
    type Config = IndependentConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn method(&self) -> ComponentMethod {
        ComponentMethod::IndependentSource
    }

    fn n_components(&self) -> usize {
        self.config.n_components
    }

    fn fit(&self, data: &Array2<f64>) -> Result<Decomposed, DecompositionError> {
        let (n, p) = data.dim();
        let k = self.config.n_components;
        check_components(k, n, p)?;
        if self.config.max_iter == 0 {
            return Err(DecompositionError::InvalidParameter(
                "max_iter must be at least 1".to_string(),
            ));
        }
        if !(self.config.tol.is_finite() && self.config.tol > 0.0) {
            return Err(DecompositionError::InvalidParameter(format!(
                "tol must be positive, got {}",
                self.config.tol
            )));
        }

        let mean = data
            .mean_axis(Axis(0))
            .ok_or_else(|| DecompositionError::InvalidParameter("no rows to fit".to_string()))?;
        let centered = data - &mean;

        let whitening = self.whitening(data)?;
        let whitened = centered.dot(&whitening.t());
        let (unmixing, iterations) = self.unmix(&whitened)?;

        let mut components = unmixing.dot(&whitening);
        let mut scores = centered.dot(&components.t());
        let std = scores.std_axis(Axis(0), 0.0);
        for ((mut score, mut component), &sd) in
            scores.columns_mut().into_iter().zip(components.rows_mut()).zip(&std)
        {
            if sd > 0.0 {
                score /= sd;
                component /= sd;
            }
        }

        let mixing = pseudo_inverse(&components).map_err(|e| math_error(self.method(), e))?;

        tracing::debug!(
            rows = n,
            features = p,
            components = k,
            iterations,
            "fitted independent sources"
        );

        Ok(Decomposed {
            loadings: components,
            scores,
            mean,
            diagnostics: Diagnostics::IndependentSource { mixing, iterations },
        })
    }
}
