//! Error types for utility functions.

use eventca_math::MathError;
use eventca_primitives::PrimitiveError;

/// Errors that can occur during utility operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Invalid parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Missing column.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Frame content violates a table invariant.
    #[error("primitive error: {0}")]
    Primitive(#[from] PrimitiveError),

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),
}

impl UtilsError {
    /// Returns whether the caller's parameters caused this error.
    #[must_use]
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter(_) | Self::Math(MathError::InvalidParameter(_)))
    }
}
