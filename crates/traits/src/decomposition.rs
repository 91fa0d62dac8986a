//! Component decomposition trait definitions.

use eventca_primitives::ComponentMethod;
use ndarray::{Array1, Array2};

/// Errors that can occur while fitting a decomposition.
#[derive(Debug, thiserror::Error)]
pub enum DecompositionError {
    /// Requested configuration cannot be satisfied by the data.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Iterative fit stopped without meeting its tolerance.
    #[error("{method} did not converge after {iterations} iterations")]
    NonConvergence {
        /// Decomposition that failed.
        method: ComponentMethod,
        /// Iterations performed.
        iterations: usize,
    },

    /// Linear algebra error.
    #[error("linear algebra error: {0}")]
    LinearAlgebra(String),
}

impl DecompositionError {
    /// Returns whether the error stems from the caller's parameters rather than the data.
    #[must_use]
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter(_))
    }
}

/// Method-specific fit diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostics {
    /// Orthogonal (PCA) diagnostics, one entry per component.
    Orthogonal {
        /// Variance captured by each component.
        explained_variance: Array1<f64>,
        /// Share of total variance captured by each component.
        explained_variance_ratio: Array1<f64>,
        /// Singular values of the centered input.
        singular_values: Array1<f64>,
    },
    /// Independent-source (FastICA) diagnostics.
    IndependentSource {
        /// Mixing matrix (`n_features x k`), the pseudo-inverse of the loadings.
        mixing: Array2<f64>,
        /// Fixed-point iterations until convergence.
        iterations: usize,
    },
}

impl Diagnostics {
    /// Diagnostics of a fit over zero rows.
    #[must_use]
    pub fn empty(method: ComponentMethod, n_features: usize) -> Self {
        match method {
            ComponentMethod::Orthogonal => Self::Orthogonal {
                explained_variance: Array1::zeros(0),
                explained_variance_ratio: Array1::zeros(0),
                singular_values: Array1::zeros(0),
            },
            ComponentMethod::IndependentSource => {
                Self::IndependentSource { mixing: Array2::zeros((n_features, 0)), iterations: 0 }
            }
        }
    }

    /// Method that produced these diagnostics.
    #[must_use]
    pub const fn method(&self) -> ComponentMethod {
        match self {
            Self::Orthogonal { .. } => ComponentMethod::Orthogonal,
            Self::IndependentSource { .. } => ComponentMethod::IndependentSource,
        }
    }

    /// Explained-variance ratios, for orthogonal fits.
    #[must_use]
    pub const fn explained_variance_ratio(&self) -> Option<&Array1<f64>> {
        match self {
            Self::Orthogonal { explained_variance_ratio, .. } => Some(explained_variance_ratio),
            Self::IndependentSource { .. } => None,
        }
    }

    /// Singular values, for orthogonal fits.
    #[must_use]
    pub const fn singular_values(&self) -> Option<&Array1<f64>> {
        match self {
            Self::Orthogonal { singular_values, .. } => Some(singular_values),
            Self::IndependentSource { .. } => None,
        }
    }

    /// Mixing matrix, for independent-source fits.
    #[must_use]
    pub const fn mixing(&self) -> Option<&Array2<f64>> {
        match self {
            Self::IndependentSource { mixing, .. } => Some(mixing),
            Self::Orthogonal { .. } => None,
        }
    }
}

/// Output of fitting a decomposition to an `n x p` matrix.
#[derive(Debug, Clone)]
pub struct Decomposed {
    /// Loading matrix (`k x p`); row `i` is component `i` across all columns.
    pub loadings: Array2<f64>,
    /// Per-row scores (`n x k`).
    pub scores: Array2<f64>,
    /// Column means subtracted before projecting (`p`).
    pub mean: Array1<f64>,
    /// Method-specific diagnostics.
    pub diagnostics: Diagnostics,
}

/// Linear decomposition of a data matrix into `k` components.
///
/// Scores satisfy `scores = (data - mean) · loadingsᵀ` for the fitted rows.
pub trait Decomposition: Send + Sync {
    /// Configuration type for this decomposition.
    type Config: Default + Clone + Send + Sync;

    /// Create a new decomposition with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Which decomposition this is.
    fn method(&self) -> ComponentMethod;

    /// Number of components the fit produces.
    fn n_components(&self) -> usize;

    /// Fit on exactly the rows and columns supplied.
    ///
    /// # Arguments
    /// * `data` - Matrix (n_rows x n_features), typically standardized
    ///
    /// # Errors
    /// Returns `DecompositionError` if `n_components` exceeds the rows or
    /// columns, or the fit fails numerically.
    fn fit(&self, data: &Array2<f64>) -> Result<Decomposed, DecompositionError>;
}
