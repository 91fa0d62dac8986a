//! Fitted transform trait definitions.

use ndarray::Array2;

/// Errors that can occur when applying a fitted transform.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Input width differs from the width the transform was fitted on.
    #[error("dimension mismatch: expected {expected} columns, got {actual}")]
    DimensionMismatch {
        /// Expected number of columns.
        expected: usize,
        /// Actual number of columns.
        actual: usize,
    },

    /// The transform has no fitted state.
    #[error("transform has not been fitted")]
    NotFitted,

    /// Numerical error (NaN, Inf).
    #[error("numerical error: {0}")]
    Numerical(String),
}

/// A transform whose parameters were learned once and are reused as-is.
pub trait FittedTransform: Send + Sync {
    /// Map rows (`n x n_features_in`) to the output space (`n x n_features_out`).
    ///
    /// # Errors
    /// Returns `TransformError` if the input width is wrong or the output is not finite.
    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, TransformError>;

    /// Number of input columns.
    fn n_features_in(&self) -> usize;

    /// Number of output columns.
    fn n_features_out(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_error_display() {
        let err = TransformError::NotFitted;
        assert_eq!(err.to_string(), "transform has not been fitted");

        let err = TransformError::DimensionMismatch { expected: 91, actual: 11 };
        assert_eq!(err.to_string(), "dimension mismatch: expected 91 columns, got 11");
    }
}
