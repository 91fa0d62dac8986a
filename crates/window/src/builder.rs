//! Cumulative return windows around every date of a return series.

use eventca_primitives::{ReturnSeries, WindowedReturns};
use ndarray::Array2;

use crate::{WindowConfig, WindowError};

/// Compute cumulative log returns over `[start_window, return_window]` for every date.
///
/// Row `r` of the source series contributes an anchor only when every return
/// from `r + start_window` through `r + return_window` exists and is finite. The
/// value at offset `t` is the sum of returns from `r + start_window` through
/// `r + t`.
///
/// # Errors
/// Returns `InvalidWindow` if the window does not bracket zero.
pub fn build_windowed_returns(
    returns: &ReturnSeries,
    config: &WindowConfig,
) -> Result<WindowedReturns, WindowError> {
    config.validate()?;

    let offsets = config.offsets();
    let width = config.width();
    let n = returns.len();
    let lead = config.start_window.unsigned_abs() as usize;
    let trail = config.return_window as usize;

    if n < width {
        tracing::debug!(rows = n, width, "return series shorter than event window");
        return Ok(WindowedReturns::empty(offsets));
    }

    let values = returns.returns();
    let anchors: Vec<usize> = (lead..n - trail)
        .filter(|&r| values[r - lead..=r + trail].iter().all(|v| v.is_finite()))
        .collect();

    let mut cumulative = Array2::zeros((anchors.len(), width));
    for (mut row, &r) in cumulative.rows_mut().into_iter().zip(&anchors) {
        let mut running = 0.0;
        for (cell, v) in row.iter_mut().zip(&values[r - lead..=r + trail]) {
            running += v;
            *cell = running;
        }
    }

    tracing::debug!(
        rows = n,
        anchors = anchors.len(),
        dropped = n - anchors.len(),
        "built windowed returns"
    );

    let dates = anchors.iter().map(|&r| returns.dates()[r]).collect();
    let anchor_returns = anchors.iter().map(|&r| values[r]).collect();

    Ok(WindowedReturns::new(dates, anchor_returns, offsets, cumulative)?)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use eventca_primitives::Date;
    use rstest::rstest;

    use super::*;

    fn day(i: usize) -> Date {
        Date::from_num_days_from_ce_opt(738_886 + i as i32).unwrap()
    }

    fn series(values: &[f64]) -> ReturnSeries {
        ReturnSeries::new((0..values.len()).map(day).collect(), values.to_vec()).unwrap()
    }

    #[test]
    fn edges_are_trimmed() {
        let returns = series(&[0.01; 20]);
        let windowed = build_windowed_returns(&returns, &WindowConfig::new(-2, 3, None)).unwrap();

        assert_eq!(windowed.len(), 15);
        assert_eq!(windowed.dates()[0], day(2));
        assert_eq!(windowed.dates()[14], day(16));
        assert_eq!(windowed.offsets(), &[-2, -1, 0, 1, 2, 3]);
    }

    #[test]
    fn cumulative_sums_from_window_start() {
        let values: Vec<f64> = (0..10).map(|i| f64::from(i) * 0.01).collect();
        let returns = series(&values);
        let windowed = build_windowed_returns(&returns, &WindowConfig::new(-1, 2, None)).unwrap();

        // anchor at index 1: returns 0.00, 0.01, 0.02, 0.03
        let row = windowed.row(0);
        assert_eq!(windowed.dates()[0], day(1));
        assert_relative_eq!(row[0], 0.00);
        assert_relative_eq!(row[1], 0.01);
        assert_relative_eq!(row[2], 0.03, epsilon = 1e-12);
        assert_relative_eq!(row[3], 0.06, epsilon = 1e-12);
        assert_relative_eq!(windowed.anchor_return(0), 0.01);
    }

    #[test]
    fn missing_return_drops_every_covering_anchor() {
        let mut values = vec![0.01; 12];
        values[6] = f64::NAN;
        let returns = series(&values);
        let windowed = build_windowed_returns(&returns, &WindowConfig::new(-1, 1, None)).unwrap();

        // anchors 1..=10 minus the three touching index 6
        assert_eq!(windowed.len(), 7);
        assert!(!windowed.dates().contains(&day(5)));
        assert!(!windowed.dates().contains(&day(6)));
        assert!(!windowed.dates().contains(&day(7)));
        assert!(windowed.cumulative().iter().all(|v| v.is_finite()));
    }

    #[rstest]
    #[case(0, -5, 5)]
    #[case(10, -5, 5)]
    #[case(11, -5, 5)]
    #[case(1, 0, 0)]
    fn short_series(#[case] n: usize, #[case] start: i64, #[case] end: i64) {
        let returns = series(&vec![0.02; n]);
        let config = WindowConfig::new(start, end, None);
        let windowed = build_windowed_returns(&returns, &config).unwrap();

        let expected = (n + 1).saturating_sub(config.width());
        assert_eq!(windowed.len(), expected);
        assert_eq!(windowed.offsets().len(), config.width());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let returns = series(&[0.01; 30]);
        let err = build_windowed_returns(&returns, &WindowConfig::new(2, 5, None)).unwrap_err();
        assert!(matches!(err, WindowError::InvalidWindow { start: 2, end: 5 }));
    }
}
