//! Event window configuration.

use eventca_primitives::OffsetLabel;
use serde::{Deserialize, Serialize};

use crate::WindowError;

/// Configuration for event window construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Offset of the first window day (<= 0).
    pub start_window: i64,
    /// Offset of the last window day (>= 0).
    pub return_window: i64,
    /// Observations required before the expanding mean is subtracted.
    /// `None` (or `Some(0)`) disables demeaning.
    pub min_periods: Option<usize>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start_window: -45,
            return_window: 45,
            min_periods: Some(8),
        }
    }
}

impl WindowConfig {
    /// Create a configuration for the window `[start_window, return_window]`.
    #[must_use]
    pub const fn new(start_window: i64, return_window: i64, min_periods: Option<usize>) -> Self {
        Self { start_window, return_window, min_periods }
    }

    /// Same window with demeaning disabled.
    #[must_use]
    pub const fn without_demeaning(mut self) -> Self {
        self.min_periods = None;
        self
    }

    /// Check that the window brackets offset zero.
    ///
    /// # Errors
    /// Returns `InvalidWindow` if `start_window > 0`, `return_window < 0`, or
    /// the number of offsets does not fit in an `i64`.
    pub const fn validate(&self) -> Result<(), WindowError> {
        let brackets_zero = self.start_window <= 0 && self.return_window >= 0;
        let representable = match self.return_window.checked_sub(self.start_window) {
            Some(span) => span < i64::MAX,
            None => false,
        };
        if brackets_zero && representable {
            Ok(())
        } else {
            Err(WindowError::InvalidWindow { start: self.start_window, end: self.return_window })
        }
    }

    /// Number of offset columns, saturating for windows that fail [`Self::validate`].
    #[must_use]
    pub const fn width(&self) -> usize {
        self.return_window.saturating_sub(self.start_window).saturating_add(1) as usize
    }

    /// Offsets in ascending order.
    #[must_use]
    pub fn offsets(&self) -> Vec<i64> {
        (self.start_window..=self.return_window).collect()
    }

    /// Offset column labels in ascending order.
    #[must_use]
    pub fn labels(&self) -> Vec<OffsetLabel> {
        OffsetLabel::range(self.start_window, self.return_window)
    }

    /// Effective demeaning warm-up, with zero treated as disabled.
    #[must_use]
    pub fn demean_periods(&self) -> Option<usize> {
        self.min_periods.filter(|&p| p > 0)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn window_config_defaults() {
        let config = WindowConfig::default();
        assert_eq!(config.start_window, -45);
        assert_eq!(config.return_window, 45);
        assert_eq!(config.min_periods, Some(8));
        assert_eq!(config.width(), 91);
        assert_eq!(config.labels().first(), Some(&OffsetLabel(-45)));
        assert_eq!(config.labels().last(), Some(&OffsetLabel(45)));
    }

    #[rstest]
    #[case(-5, 5, true)]
    #[case(0, 0, true)]
    #[case(-3, 0, true)]
    #[case(1, 5, false)]
    #[case(-5, -1, false)]
    #[case(i64::MIN + 2, 0, true)]
    #[case(i64::MIN, 0, false)]
    #[case(0, i64::MAX - 1, true)]
    #[case(0, i64::MAX, false)]
    #[case(-1, i64::MAX, false)]
    #[case(i64::MIN, i64::MAX, false)]
    fn validate_brackets_zero(#[case] start: i64, #[case] end: i64, #[case] ok: bool) {
        let config = WindowConfig::new(start, end, None);
        assert_eq!(config.validate().is_ok(), ok);
    }

    #[rstest]
    #[case(Some(8), Some(8))]
    #[case(Some(1), Some(1))]
    #[case(Some(0), None)]
    #[case(None, None)]
    fn demean_periods_treats_zero_as_disabled(
        #[case] min_periods: Option<usize>,
        #[case] expected: Option<usize>,
    ) {
        let config = WindowConfig { min_periods, ..Default::default() };
        assert_eq!(config.demean_periods(), expected);
    }

    #[test]
    fn without_demeaning_keeps_window() {
        let config = WindowConfig::new(-10, 20, Some(3)).without_demeaning();
        assert_eq!(config, WindowConfig::new(-10, 20, None));
    }
}
