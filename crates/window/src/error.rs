//! Error types for window construction.

use eventca_primitives::PrimitiveError;

/// Errors that can occur while building or aligning event windows.
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    /// Window bounds do not bracket the event date, or span too many offsets.
    #[error("invalid window [{start}, {end}]: start must be <= 0 <= end")]
    InvalidWindow {
        /// Offset of the first window day.
        start: i64,
        /// Offset of the last window day.
        end: i64,
    },

    /// Precomputed windowed returns cover a different window than the configuration.
    #[error("windowed returns cover [{actual_start}, {actual_end}], expected [{start}, {end}]")]
    MismatchedWindow {
        /// Configured first offset.
        start: i64,
        /// Configured last offset.
        end: i64,
        /// First offset of the windowed returns.
        actual_start: i64,
        /// Last offset of the windowed returns.
        actual_end: i64,
    },

    /// A constructed table violated its invariants.
    #[error("primitive error: {0}")]
    Primitive(#[from] PrimitiveError),
}

impl WindowError {
    /// Returns whether the caller's parameters caused this error.
    #[must_use]
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidWindow { .. } | Self::MismatchedWindow { .. })
    }
}
