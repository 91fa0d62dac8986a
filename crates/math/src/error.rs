//! Error types for mathematical operations.

/// Errors that can occur during mathematical operations.
#[derive(Debug, thiserror::Error)]
pub enum MathError {
    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Linear algebra error.
    #[error("linear algebra error: {0}")]
    LinearAlgebra(String),

    /// Empty data.
    #[error("empty data provided")]
    EmptyData,

    /// Iterative routine did not converge.
    #[error("failed to converge after {iterations} iterations")]
    NonConvergence {
        /// Iterations (or sweeps) performed.
        iterations: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
