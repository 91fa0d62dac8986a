//! Event rows aligned to their event windows.

use ndarray::{Array2, ArrayView1, Axis};

use crate::{ComponentName, Date, EventTable, OffsetLabel, PrimitiveError};

/// Events matched to the latest window anchor strictly before each event date.
///
/// Row `i` of [`Self::values`] holds the (possibly demeaned) cumulative return of
/// event `i` at every relative offset in [`Self::offsets`]. Rows are in
/// chronological event order and contain no undefined values.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedEvents {
    events: EventTable,
    aligned_dates: Vec<Date>,
    aligned_returns: Vec<f64>,
    offsets: Vec<OffsetLabel>,
    values: Array2<f64>,
}

impl AlignedEvents {
    /// Create aligned events.
    ///
    /// # Errors
    /// Returns an error if any per-row vector or the value matrix disagrees with
    /// the number of events, or the matrix width disagrees with the offsets.
    pub fn new(
        events: EventTable,
        aligned_dates: Vec<Date>,
        aligned_returns: Vec<f64>,
        offsets: Vec<OffsetLabel>,
        values: Array2<f64>,
    ) -> Result<Self, PrimitiveError> {
        let n = events.len();
        for (context, actual) in [
            ("aligned dates", aligned_dates.len()),
            ("aligned returns", aligned_returns.len()),
            ("offset rows", values.nrows()),
        ] {
            if actual != n {
                return Err(PrimitiveError::LengthMismatch {
                    context: context.to_string(),
                    expected: n,
                    actual,
                });
            }
        }
        if values.ncols() != offsets.len() {
            return Err(PrimitiveError::LengthMismatch {
                context: "offset columns".to_string(),
                expected: offsets.len(),
                actual: values.ncols(),
            });
        }

        Ok(Self { events, aligned_dates, aligned_returns, offsets, values })
    }

    /// Aligned events with no rows.
    #[must_use]
    pub fn empty(offsets: Vec<OffsetLabel>) -> Self {
        let width = offsets.len();
        Self {
            events: EventTable::default(),
            aligned_dates: Vec::new(),
            aligned_returns: Vec::new(),
            offsets,
            values: Array2::zeros((0, width)),
        }
    }

    /// Number of surviving events.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Surviving events with their original metadata.
    #[must_use]
    pub const fn events(&self) -> &EventTable {
        &self.events
    }

    /// Event dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        self.events.dates()
    }

    /// Anchor date of the window each event was matched to.
    #[must_use]
    pub fn aligned_dates(&self) -> &[Date] {
        &self.aligned_dates
    }

    /// Raw log return on each matched anchor date.
    #[must_use]
    pub fn aligned_returns(&self) -> &[f64] {
        &self.aligned_returns
    }

    /// Offset labels, ascending.
    #[must_use]
    pub fn offsets(&self) -> &[OffsetLabel] {
        &self.offsets
    }

    /// The `events x offsets` abnormal-return matrix.
    #[must_use]
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Values of one offset column.
    #[must_use]
    pub fn column(&self, label: OffsetLabel) -> Option<ArrayView1<'_, f64>> {
        self.offsets.iter().position(|l| *l == label).map(|j| self.values.column(j))
    }

    /// Matrix of the requested offset columns, in the requested order.
    ///
    /// # Errors
    /// Returns `UnknownOffset` if a label is not present.
    pub fn select(&self, labels: &[OffsetLabel]) -> Result<Array2<f64>, PrimitiveError> {
        let positions = labels
            .iter()
            .map(|label| {
                self.offsets
                    .iter()
                    .position(|l| l == label)
                    .ok_or_else(|| PrimitiveError::UnknownOffset(label.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.values.select(Axis(1), &positions))
    }
}

/// Aligned events augmented with one score column per component.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEvents {
    aligned: AlignedEvents,
    names: Vec<ComponentName>,
    scores: Array2<f64>,
}

impl ScoredEvents {
    /// Attach component scores to aligned events.
    ///
    /// # Errors
    /// Returns an error if the score matrix shape disagrees with the events or names.
    pub fn new(
        aligned: AlignedEvents,
        names: Vec<ComponentName>,
        scores: Array2<f64>,
    ) -> Result<Self, PrimitiveError> {
        if scores.nrows() != aligned.len() {
            return Err(PrimitiveError::LengthMismatch {
                context: "score rows".to_string(),
                expected: aligned.len(),
                actual: scores.nrows(),
            });
        }
        if scores.ncols() != names.len() {
            return Err(PrimitiveError::LengthMismatch {
                context: "score columns".to_string(),
                expected: names.len(),
                actual: scores.ncols(),
            });
        }
        Ok(Self { aligned, names, scores })
    }

    /// Number of events.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.aligned.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.aligned.is_empty()
    }

    /// The underlying aligned events.
    #[must_use]
    pub const fn aligned(&self) -> &AlignedEvents {
        &self.aligned
    }

    /// Component names, in column order.
    #[must_use]
    pub fn names(&self) -> &[ComponentName] {
        &self.names
    }

    /// The `events x components` score matrix.
    #[must_use]
    pub const fn scores(&self) -> &Array2<f64> {
        &self.scores
    }

    /// Scores of one component by name (`"PC1"`, `"IC2"`, ...).
    #[must_use]
    pub fn score(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.names.iter().position(|n| n.to_string() == name).map(|j| self.scores.column(j))
    }
}
