//! Return series definitions.

use serde::{Deserialize, Serialize};

use crate::{Date, PrimitiveError};

/// Log returns of a single asset, one row per trading date.
///
/// Dates are strictly ascending, so the row index doubles as the trading-day axis
/// used for event windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    dates: Vec<Date>,
    returns: Vec<f64>,
}

impl ReturnSeries {
    /// Create a return series from already-sorted dates.
    ///
    /// A `NaN` return marks a missing observation.
    ///
    /// # Errors
    /// Returns an error if lengths differ or dates are not strictly ascending.
    pub fn new(dates: Vec<Date>, returns: Vec<f64>) -> Result<Self, PrimitiveError> {
        if dates.len() != returns.len() {
            return Err(PrimitiveError::LengthMismatch {
                context: "returns".to_string(),
                expected: dates.len(),
                actual: returns.len(),
            });
        }

        for (i, pair) in dates.windows(2).enumerate() {
            if pair[1] == pair[0] {
                return Err(PrimitiveError::DuplicateDate(pair[1]));
            }
            if pair[1] < pair[0] {
                return Err(PrimitiveError::UnsortedDates(i + 1));
            }
        }

        Ok(Self { dates, returns })
    }

    /// Create a return series from `(date, return)` pairs in any order.
    ///
    /// # Errors
    /// Returns an error if a date appears more than once.
    pub fn from_unsorted(mut rows: Vec<(Date, f64)>) -> Result<Self, PrimitiveError> {
        rows.sort_by_key(|(date, _)| *date);
        let (dates, returns) = rows.into_iter().unzip();
        Self::new(dates, returns)
    }

    /// Number of trading dates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Trading dates in ascending order.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Log returns aligned with [`Self::dates`].
    #[must_use]
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }
}
