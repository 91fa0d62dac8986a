//! Component analysis configuration.

use eventca_math::MathError;
use eventca_primitives::ComponentMethod;
use eventca_traits::DecompositionError;
use serde::{Deserialize, Serialize};

/// Configuration for the orthogonal (PCA) decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrthogonalConfig {
    /// Number of components to keep.
    pub n_components: usize,
}

impl Default for OrthogonalConfig {
    fn default() -> Self {
        Self { n_components: 3 }
    }
}

/// Configuration for the independent-source (FastICA) decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndependentConfig {
    /// Number of sources to recover.
    pub n_components: usize,
    /// Seed for the initial unmixing matrix.
    pub seed: u64,
    /// Maximum fixed-point iterations.
    pub max_iter: usize,
    /// Convergence tolerance on the unmixing update.
    pub tol: f64,
}

impl Default for IndependentConfig {
    fn default() -> Self {
        Self { n_components: 3, seed: 42, max_iter: 200, tol: 1e-4 }
    }
}

/// Configuration for [`add_components`](crate::add_components).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentConfig {
    /// Decomposition to fit.
    pub method: ComponentMethod,
    /// Number of components.
    pub n_components: usize,
    /// Seed for FastICA initialization (ignored by PCA).
    pub seed: u64,
    /// Maximum FastICA iterations (ignored by PCA).
    pub max_iter: usize,
    /// FastICA convergence tolerance (ignored by PCA).
    pub tol: f64,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        let ica = IndependentConfig::default();
        Self {
            method: ComponentMethod::default(),
            n_components: ica.n_components,
            seed: ica.seed,
            max_iter: ica.max_iter,
            tol: ica.tol,
        }
    }
}

impl ComponentConfig {
    /// Default configuration for `method` with `n_components` components.
    #[must_use]
    pub fn new(method: ComponentMethod, n_components: usize) -> Self {
        Self { method, n_components, ..Default::default() }
    }

    /// Settings for the orthogonal decomposition.
    #[must_use]
    pub const fn orthogonal(&self) -> OrthogonalConfig {
        OrthogonalConfig { n_components: self.n_components }
    }

    /// Settings for the independent-source decomposition.
    #[must_use]
    pub const fn independent(&self) -> IndependentConfig {
        IndependentConfig {
            n_components: self.n_components,
            seed: self.seed,
            max_iter: self.max_iter,
            tol: self.tol,
        }
    }
}

/// Reject component counts the data cannot support.
pub(crate) fn check_components(
    k: usize,
    n_rows: usize,
    n_features: usize,
) -> Result<(), DecompositionError> {
    if k == 0 {
        return Err(DecompositionError::InvalidParameter(
            "n_components must be at least 1".to_string(),
        ));
    }
    if k > n_features {
        return Err(DecompositionError::InvalidParameter(format!(
            "n_components ({k}) exceeds the number of columns ({n_features})"
        )));
    }
    if k > n_rows {
        return Err(DecompositionError::InvalidParameter(format!(
            "n_components ({k}) exceeds the number of rows ({n_rows})"
        )));
    }
    Ok(())
}

/// Attribute a math failure to the decomposition that hit it.
pub(crate) fn math_error(method: ComponentMethod, err: MathError) -> DecompositionError {
    match err {
        MathError::NonConvergence { iterations } => {
            DecompositionError::NonConvergence { method, iterations }
        }
        other => DecompositionError::LinearAlgebra(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn component_config_defaults() {
        let config = ComponentConfig::default();
        assert_eq!(config.method, ComponentMethod::Orthogonal);
        assert_eq!(config.n_components, 3);
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_iter, 200);
        assert_eq!(config.tol, 1e-4);
        assert_eq!(config.independent(), IndependentConfig::default());
        assert_eq!(config.orthogonal(), OrthogonalConfig::default());
    }

    #[test]
    fn new_keeps_ica_defaults() {
        let config = ComponentConfig::new(ComponentMethod::IndependentSource, 5);
        assert_eq!(config.independent().n_components, 5);
        assert_eq!(config.independent().seed, 42);
    }

    #[rstest]
    #[case(0, 10, 5, false)]
    #[case(1, 10, 5, true)]
    #[case(5, 10, 5, true)]
    #[case(6, 10, 5, false)]
    #[case(3, 2, 5, false)]
    #[case(2, 2, 5, true)]
    fn component_count_bounds(
        #[case] k: usize,
        #[case] rows: usize,
        #[case] cols: usize,
        #[case] ok: bool,
    ) {
        assert_eq!(check_components(k, rows, cols).is_ok(), ok);
    }

    #[test]
    fn eigen_non_convergence_keeps_method() {
        let err =
            math_error(ComponentMethod::Orthogonal, MathError::NonConvergence { iterations: 100 });
        assert!(matches!(
            err,
            DecompositionError::NonConvergence {
                method: ComponentMethod::Orthogonal,
                iterations: 100
            }
        ));

        let err = math_error(ComponentMethod::Orthogonal, MathError::EmptyData);
        assert!(matches!(err, DecompositionError::LinearAlgebra(_)));
    }
}
