//! Event alignment and abnormal-return demeaning.

use eventca_math::ExpandingMean;
use eventca_primitives::{AlignedEvents, EventTable, OffsetLabel, ReturnSeries, WindowedReturns};
use ndarray::{Array2, Axis};

use crate::{WindowConfig, WindowError, build_windowed_returns};

/// Aligns events to windowed returns and removes the expanding-mean baseline.
#[derive(Debug, Clone, Default)]
pub struct EventAligner {
    config: WindowConfig,
}

impl EventAligner {
    /// Create a new aligner with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WindowConfig::default())
    }

    /// Create a new aligner with custom configuration.
    #[must_use]
    pub const fn with_config(config: WindowConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Align events to the return series.
    ///
    /// Events are processed in chronological order (ties keep input order) and
    /// each is matched to the latest window anchor strictly before its date.
    /// Every offset column then has its expanding mean subtracted, where the mean
    /// covers the current and all earlier matched rows and is defined once
    /// `min_periods` rows have been seen. Rows without a match or with an
    /// undefined mean are dropped.
    ///
    /// # Returns
    /// Tuple of (aligned events, ascending offset labels)
    ///
    /// # Errors
    /// Returns `WindowError` if the window is inverted.
    pub fn align(
        &self,
        events: &EventTable,
        returns: &ReturnSeries,
    ) -> Result<(AlignedEvents, Vec<OffsetLabel>), WindowError> {
        let windowed = build_windowed_returns(returns, &self.config)?;
        self.align_windowed(events, &windowed)
    }

    /// Align events to precomputed windowed returns.
    ///
    /// # Errors
    /// Returns `WindowError` if the window is inverted or the windowed returns
    /// were built for a different window.
    pub fn align_windowed(
        &self,
        events: &EventTable,
        windowed: &WindowedReturns,
    ) -> Result<(AlignedEvents, Vec<OffsetLabel>), WindowError> {
        self.config.validate()?;
        if windowed.offsets() != self.config.offsets().as_slice() {
            return Err(WindowError::MismatchedWindow {
                start: self.config.start_window,
                end: self.config.return_window,
                actual_start: windowed.offsets().first().copied().unwrap_or_default(),
                actual_end: windowed.offsets().last().copied().unwrap_or_default(),
            });
        }
        let labels = self.config.labels();
        let width = labels.len();

        let order = events.chronological_order();
        let matches: Vec<Option<usize>> =
            order.iter().map(|&i| windowed.asof_before(events.dates()[i])).collect();

        let mut values = Array2::from_elem((order.len(), width), f64::NAN);
        for (mut row, matched) in values.rows_mut().into_iter().zip(&matches) {
            if let Some(anchor) = matched {
                row.assign(&windowed.row(*anchor));
            }
        }

        if let Some(min_periods) = self.config.demean_periods() {
            for mut column in values.columns_mut() {
                let mut baseline = ExpandingMean::new(min_periods);
                for value in &mut column {
                    let raw = *value;
                    *value = baseline.push(raw).map_or(f64::NAN, |mean| raw - mean);
                }
            }
        }

        let kept: Vec<usize> = (0..order.len())
            .filter(|&i| matches[i].is_some() && values.row(i).iter().all(|v| v.is_finite()))
            .collect();
        let unmatched = matches.iter().filter(|m| m.is_none()).count();

        tracing::debug!(
            events = order.len(),
            unmatched,
            warmup = order.len() - unmatched - kept.len(),
            kept = kept.len(),
            "aligned events to windows"
        );

        let source_rows: Vec<usize> = kept.iter().map(|&i| order[i]).collect();
        let anchors: Vec<usize> = kept.iter().filter_map(|&i| matches[i]).collect();

        let aligned = AlignedEvents::new(
            events.take(&source_rows),
            anchors.iter().map(|&a| windowed.dates()[a]).collect(),
            anchors.iter().map(|&a| windowed.anchor_return(a)).collect(),
            labels.clone(),
            values.select(Axis(0), &kept),
        )?;

        Ok((aligned, labels))
    }
}

/// Build event windows around `events` from `returns` and align them.
///
/// Shorthand for [`EventAligner::align`] with the given configuration.
///
/// # Errors
/// Returns `WindowError` if the window is inverted.
pub fn construct_event_windows(
    events: &EventTable,
    returns: &ReturnSeries,
    config: &WindowConfig,
) -> Result<(AlignedEvents, Vec<OffsetLabel>), WindowError> {
    EventAligner::with_config(config.clone()).align(events, returns)
}
