//! Expanding-window statistics.

/// Running mean over every observation seen so far, gated by a minimum count.
///
/// Observations are pushed in chronological order; the mean reported after a
/// push covers that observation and all earlier ones, never later ones. `NaN`
/// is treated as missing and does not count toward `min_periods`.
#[derive(Debug, Clone)]
pub struct ExpandingMean {
    min_periods: usize,
    sum: f64,
    compensation: f64,
    count: usize,
}

impl ExpandingMean {
    /// Create an accumulator that reports a mean once `min_periods` observations
    /// are available. A mean always needs at least one observation.
    #[must_use]
    pub const fn new(min_periods: usize) -> Self {
        Self { min_periods, sum: 0.0, compensation: 0.0, count: 0 }
    }

    /// Add an observation and return the mean including it.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if !value.is_nan() {
            // Neumaier compensated summation
            let t = self.sum + value;
            if self.sum.abs() >= value.abs() {
                self.compensation += (self.sum - t) + value;
            } else {
                self.compensation += (value - t) + self.sum;
            }
            self.sum = t;
            self.count += 1;
        }
        self.mean()
    }

    /// Mean of the observations so far, if enough have been seen.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 || self.count < self.min_periods {
            return None;
        }
        Some((self.sum + self.compensation) / self.count as f64)
    }
}

/// Subtract the expanding mean from each value.
///
/// Position `i` becomes `values[i] - mean(values[..=i])`, or `NaN` while fewer
/// than `min_periods` non-missing values have been seen (or if `values[i]` is
/// itself missing).
#[must_use]
pub fn expanding_demean(values: &[f64], min_periods: usize) -> Vec<f64> {
    let mut acc = ExpandingMean::new(min_periods);
    values.iter().map(|&x| acc.push(x).map_or(f64::NAN, |mean| x - mean)).collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn mean_uses_only_past_values() {
        let mut acc = ExpandingMean::new(1);
        assert_eq!(acc.push(2.0), Some(2.0));
        assert_eq!(acc.push(4.0), Some(3.0));
        assert_eq!(acc.push(9.0), Some(5.0));
        assert_eq!(acc.push(f64::NAN), Some(5.0));
    }

    #[test]
    fn warm_up_is_undefined() {
        let out = expanding_demean(&[1.0, 2.0, 3.0, 4.0], 3);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_relative_eq!(out[2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(out[3], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn missing_values_do_not_count() {
        let out = expanding_demean(&[1.0, f64::NAN, 3.0, 5.0], 2);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_relative_eq!(out[2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(out[3], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn appending_does_not_change_prefix() {
        let base = [0.3, -0.1, 0.7, 0.2, 0.05];
        let mut extended = base.to_vec();
        extended.extend([10.0, -4.0]);

        let short = expanding_demean(&base, 2);
        let long = expanding_demean(&extended, 2);
        for i in 0..base.len() {
            assert!(short[i].is_nan() && long[i].is_nan() || short[i] == long[i]);
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn zero_or_one_min_periods_defines_first_row(#[case] min_periods: usize) {
        let out = expanding_demean(&[5.0, 7.0], min_periods);
        assert_relative_eq!(out[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(out[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn compensated_sum_stays_accurate() {
        let mut acc = ExpandingMean::new(1);
        acc.push(1e16);
        for _ in 0..10 {
            acc.push(1.0);
        }
        acc.push(-1e16);
        assert_relative_eq!(acc.mean().unwrap(), 10.0 / 12.0, epsilon = 1e-12);
    }
}
