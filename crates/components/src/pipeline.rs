//! Fitted standardize-then-project pipelines.

use eventca_math::{MathError, StandardScaler};
use eventca_traits::{Decomposed, FittedTransform, TransformError};
use ndarray::{Array1, Array2};

/// Linear projection `(x - mean) · loadingsᵀ` learned by a decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    mean: Array1<f64>,
    loadings: Array2<f64>,
}

impl Projection {
    /// Create a projection from a column mean (`p`) and loadings (`k x p`).
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the mean length differs from the loading width.
    pub fn new(mean: Array1<f64>, loadings: Array2<f64>) -> Result<Self, TransformError> {
        if mean.len() != loadings.ncols() {
            return Err(TransformError::DimensionMismatch {
                expected: loadings.ncols(),
                actual: mean.len(),
            });
        }
        Ok(Self { mean, loadings })
    }

    /// Column mean subtracted before projecting.
    #[must_use]
    pub const fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Loading matrix (`k x p`).
    #[must_use]
    pub const fn loadings(&self) -> &Array2<f64> {
        &self.loadings
    }
}

impl From<&Decomposed> for Projection {
    fn from(decomposed: &Decomposed) -> Self {
        Self { mean: decomposed.mean.clone(), loadings: decomposed.loadings.clone() }
    }
}

impl FittedTransform for Projection {
    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, TransformError> {
        if data.ncols() != self.n_features_in() {
            return Err(TransformError::DimensionMismatch {
                expected: self.n_features_in(),
                actual: data.ncols(),
            });
        }
        Ok((data - &self.mean).dot(&self.loadings.t()))
    }

    fn n_features_in(&self) -> usize {
        self.loadings.ncols()
    }

    fn n_features_out(&self) -> usize {
        self.loadings.nrows()
    }
}

/// Column standardization followed by a fitted projection.
///
/// Applying the pipeline to the rows it was fitted on reproduces their scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentPipeline {
    scaler: StandardScaler,
    projection: Projection,
}

impl ComponentPipeline {
    /// Chain a scaler and a projection.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the scaler output width differs from the
    /// projection input width.
    pub fn new(scaler: StandardScaler, projection: Projection) -> Result<Self, TransformError> {
        if scaler.n_features() != projection.n_features_in() {
            return Err(TransformError::DimensionMismatch {
                expected: projection.n_features_in(),
                actual: scaler.n_features(),
            });
        }
        Ok(Self { scaler, projection })
    }

    /// The standardization step.
    #[must_use]
    pub const fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// The projection step.
    #[must_use]
    pub const fn projection(&self) -> &Projection {
        &self.projection
    }
}

impl FittedTransform for ComponentPipeline {
    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, TransformError> {
        let standardized = self.scaler.transform(data).map_err(scaler_error)?;
        let scores = self.projection.transform(&standardized)?;
        if scores.iter().any(|v| !v.is_finite()) {
            return Err(TransformError::Numerical("non-finite component score".to_string()));
        }
        Ok(scores)
    }

    fn n_features_in(&self) -> usize {
        self.scaler.n_features()
    }

    fn n_features_out(&self) -> usize {
        self.projection.n_features_out()
    }
}

fn scaler_error(err: MathError) -> TransformError {
    match err {
        MathError::DimensionMismatch { expected, actual } => {
            TransformError::DimensionMismatch { expected, actual }
        }
        other => TransformError::Numerical(other.to_string()),
    }
}
