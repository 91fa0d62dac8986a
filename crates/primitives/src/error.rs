//! Error types for primitive construction.

use crate::Date;

/// Errors raised when a table or series violates its invariants.
#[derive(Debug, thiserror::Error)]
pub enum PrimitiveError {
    /// Column or vector lengths disagree.
    #[error("length mismatch for {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// What was being built.
        context: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Dates are not in ascending order.
    #[error("dates are not sorted ascending at position {0}")]
    UnsortedDates(usize),

    /// The same date appears twice in a series that must be unique.
    #[error("duplicate date: {0}")]
    DuplicateDate(Date),

    /// A column with this name already exists.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// A column label does not name a relative offset.
    #[error("unknown offset column: {0}")]
    UnknownOffset(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PrimitiveError::LengthMismatch {
            context: "returns".to_string(),
            expected: 10,
            actual: 9,
        };
        assert_eq!(err.to_string(), "length mismatch for returns: expected 10, got 9");

        let date = Date::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(PrimitiveError::DuplicateDate(date).to_string().contains("2024-03-01"));
    }
}
