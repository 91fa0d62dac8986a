//! Column standardization.

use ndarray::{Array1, Array2, Axis};

use crate::MathError;

/// Per-column standardization to zero mean and unit population variance.
///
/// Columns with (numerically) zero variance keep a scale of 1 so they map to
/// zero instead of `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Fit column means and standard deviations.
    ///
    /// # Errors
    /// Returns `MathError::EmptyData` if the matrix has no rows.
    pub fn fit(data: &Array2<f64>) -> Result<Self, MathError> {
        let mean = data.mean_axis(Axis(0)).ok_or(MathError::EmptyData)?;
        let scale = data
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s.is_finite() && s >= 10.0 * f64::EPSILON { s } else { 1.0 });

        Ok(Self { mean, scale })
    }

    /// Create a scaler from known parameters.
    ///
    /// # Errors
    /// Returns an error if the lengths differ.
    pub fn from_parts(mean: Array1<f64>, scale: Array1<f64>) -> Result<Self, MathError> {
        if mean.len() != scale.len() {
            return Err(MathError::DimensionMismatch { expected: mean.len(), actual: scale.len() });
        }
        Ok(Self { mean, scale })
    }

    /// Fitted column means.
    #[must_use]
    pub const fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Fitted column scales.
    #[must_use]
    pub const fn scale(&self) -> &Array1<f64> {
        &self.scale
    }

    /// Number of columns the scaler was fitted on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardize rows with the fitted parameters.
    ///
    /// # Errors
    /// Returns an error if the column count differs from the fitted data.
    pub fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, MathError> {
        self.check_width(data)?;
        Ok((data - &self.mean) / &self.scale)
    }

    fn check_width(&self, data: &Array2<f64>) -> Result<(), MathError> {
        if data.ncols() != self.n_features() {
            return Err(MathError::DimensionMismatch {
                expected: self.n_features(),
                actual: data.ncols(),
            });
        }
        Ok(())
    }
}
