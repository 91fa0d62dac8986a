//! Error types for component analysis.

use eventca_math::MathError;
use eventca_primitives::PrimitiveError;
use eventca_traits::{DecompositionError, TransformError};

/// Errors that can occur while adding components to events.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// Decomposition fit failed.
    #[error("decomposition error: {0}")]
    Decomposition(#[from] DecompositionError),

    /// Applying a fitted transform failed.
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Result table could not be built.
    #[error("primitive error: {0}")]
    Primitive(#[from] PrimitiveError),

    /// An offset label does not name a column of the table.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Invalid configuration.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ComponentError {
    /// Returns whether the caller's parameters caused this error.
    #[must_use]
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter(_) | Self::Decomposition(DecompositionError::InvalidParameter(_))
        )
    }

    /// Returns whether an iterative fit ran out of iterations.
    #[must_use]
    pub const fn is_non_convergence(&self) -> bool {
        matches!(self, Self::Decomposition(DecompositionError::NonConvergence { .. }))
    }
}
