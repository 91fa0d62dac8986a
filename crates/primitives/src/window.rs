//! Relative event-window definitions.

use derive_more::{Display, From, Into};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::{Date, PrimitiveError};

/// Label of a relative-day column, displayed as the bare offset (`"-45"`, `"0"`, `"12"`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
pub struct OffsetLabel(pub i64);

impl OffsetLabel {
    /// Create a new offset label.
    #[must_use]
    pub const fn new(offset: i64) -> Self {
        Self(offset)
    }

    /// The relative offset in trading days.
    #[must_use]
    pub const fn offset(self) -> i64 {
        self.0
    }

    /// Labels for every offset in `[start, end]`, ascending.
    #[must_use]
    pub fn range(start: i64, end: i64) -> Vec<Self> {
        (start..=end).map(Self).collect()
    }
}

/// Cumulative log returns over a relative window, anchored at each return date.
///
/// Row `r` holds, for each offset `t`, the sum of returns from offset
/// `start_window` through `t` around the anchor date. Only anchors with full
/// window coverage are present, so the first and last rows of the source series
/// are usually missing.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedReturns {
    dates: Vec<Date>,
    returns: Vec<f64>,
    offsets: Vec<i64>,
    cumulative: Array2<f64>,
}

impl WindowedReturns {
    /// Create windowed returns.
    ///
    /// # Errors
    /// Returns an error if dimensions disagree or anchor dates are not strictly ascending.
    pub fn new(
        dates: Vec<Date>,
        returns: Vec<f64>,
        offsets: Vec<i64>,
        cumulative: Array2<f64>,
    ) -> Result<Self, PrimitiveError> {
        if returns.len() != dates.len() {
            return Err(PrimitiveError::LengthMismatch {
                context: "anchor returns".to_string(),
                expected: dates.len(),
                actual: returns.len(),
            });
        }
        if cumulative.nrows() != dates.len() {
            return Err(PrimitiveError::LengthMismatch {
                context: "cumulative rows".to_string(),
                expected: dates.len(),
                actual: cumulative.nrows(),
            });
        }
        if cumulative.ncols() != offsets.len() {
            return Err(PrimitiveError::LengthMismatch {
                context: "cumulative columns".to_string(),
                expected: offsets.len(),
                actual: cumulative.ncols(),
            });
        }
        if let Some(i) = dates.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(PrimitiveError::UnsortedDates(i + 1));
        }

        Ok(Self { dates, returns, offsets, cumulative })
    }

    /// Windowed returns with no anchor rows.
    #[must_use]
    pub fn empty(offsets: Vec<i64>) -> Self {
        let width = offsets.len();
        Self {
            dates: Vec::new(),
            returns: Vec::new(),
            offsets,
            cumulative: Array2::zeros((0, width)),
        }
    }

    /// Number of anchor rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Anchor dates, ascending.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Relative offsets, ascending.
    #[must_use]
    pub fn offsets(&self) -> &[i64] {
        &self.offsets
    }

    /// Raw log return on the anchor date of row `row`.
    #[must_use]
    pub fn anchor_return(&self, row: usize) -> f64 {
        self.returns[row]
    }

    /// Cumulative returns for one anchor row, one value per offset.
    #[must_use]
    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.cumulative.row(row)
    }

    /// The full `anchors x offsets` matrix.
    #[must_use]
    pub const fn cumulative(&self) -> &Array2<f64> {
        &self.cumulative
    }

    /// Row of the latest anchor date strictly before `date`.
    ///
    /// Exact matches are skipped: an event is never aligned to a window
    /// anchored on its own date.
    #[must_use]
    pub fn asof_before(&self, date: Date) -> Option<usize> {
        let idx = self.dates.partition_point(|d| *d < date);
        idx.checked_sub(1)
    }
}
