//! Orthogonal decomposition (principal components).

use eventca_math::{DEFAULT_EIGEN_SWEEPS, DEFAULT_EIGEN_TOLERANCE, covariance, symmetric_eigen};
use eventca_primitives::ComponentMethod;
use eventca_traits::{Decomposed, Decomposition, DecompositionError, Diagnostics};
use ndarray::{Array1, Array2, Axis, s};

use crate::{
    OrthogonalConfig,
    config::{check_components, math_error},
};

/// Principal components of a data matrix.
///
/// Loadings are the leading eigenvectors of the sample covariance matrix
/// (divisor `n - 1`), ordered by descending eigenvalue. Each loading vector is
/// flipped so its largest-magnitude entry is positive, which makes the fit
/// fully deterministic.
#[derive(Debug, Clone, Default)]
pub struct OrthogonalDecomposer {
    config: OrthogonalConfig,
}

impl OrthogonalDecomposer {
    /// Create a new decomposer with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(OrthogonalConfig::default())
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &OrthogonalConfig {
        &self.config
    }
}

impl Decomposition for OrthogonalDecomposer {
    type Config = OrthogonalConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn method(&self) -> ComponentMethod {
        ComponentMethod::Orthogonal
    }

    fn n_components(&self) -> usize {
        self.config.n_components
    }

    fn fit(&self, data: &Array2<f64>) -> Result<Decomposed, DecompositionError> {
        let (n, p) = data.dim();
        let k = self.config.n_components;
        check_components(k, n, p)?;

        let method = self.method();
        let mean = data
            .mean_axis(Axis(0))
            .ok_or_else(|| DecompositionError::InvalidParameter("no rows to fit".to_string()))?;
        let centered = data - &mean;

        let cov = covariance(data, 1).map_err(|e| math_error(method, e))?;
        let eigen = symmetric_eigen(&cov, DEFAULT_EIGEN_SWEEPS, DEFAULT_EIGEN_TOLERANCE)
            .map_err(|e| math_error(method, e))?;

        let mut loadings = eigen.eigenvectors.slice(s![.., ..k]).t().to_owned();
        for mut row in loadings.rows_mut() {
            let pivot =
                row.iter().fold(0.0_f64, |best, &v| if v.abs() > best.abs() { v } else { best });
            if pivot < 0.0 {
                row.mapv_inplace(|v| -v);
            }
        }

        // round-off can leave trailing eigenvalues slightly negative
        let eigenvalues = eigen.eigenvalues.mapv(|l| l.max(0.0));
        let total = eigenvalues.sum();
        let explained_variance = eigenvalues.slice(s![..k]).to_owned();
        let explained_variance_ratio =
            if total > 0.0 { &explained_variance / total } else { Array1::zeros(k) };
        let dof = n.saturating_sub(1).max(1) as f64;
        let singular_values = explained_variance.mapv(|l| (l * dof).sqrt());

        let scores = centered.dot(&loadings.t());

        tracing::debug!(
            rows = n,
            features = p,
            components = k,
            sweeps = eigen.sweeps,
            "fitted orthogonal components"
        );

        Ok(Decomposed {
            loadings,
            scores,
            mean,
            diagnostics: Diagnostics::Orthogonal {
                explained_variance,
                explained_variance_ratio,
                singular_values,
            },
        })
    }
}
