//! Quantiles and equal-frequency binning.

use crate::MathError;

/// Linearly interpolated quantile of already-sorted data.
///
/// # Arguments
/// * `sorted` - Values sorted ascending, without `NaN`
/// * `q` - Quantile in `[0, 1]`
///
/// # Errors
/// Returns an error if `sorted` is empty or `q` is outside `[0, 1]`.
pub fn quantile(sorted: &[f64], q: f64) -> Result<f64, MathError> {
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::InvalidParameter(format!("quantile {q} outside [0, 1]")));
    }
    let (first, last) = match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(MathError::EmptyData),
    };
    if sorted.len() == 1 {
        return Ok(first);
    }

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if hi >= sorted.len() {
        return Ok(last);
    }
    let frac = pos - lo as f64;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Assign each value to one of `n_bins` equal-frequency bins.
///
/// Bin edges are the `i / n_bins` quantiles of the non-missing values. Bins are
/// right-closed and the lowest edge is included, so bin `0` holds the smallest
/// values. Missing (`NaN`) values get no bin.
///
/// # Errors
/// Returns an error if `n_bins` is zero, there are no non-missing values, or two
/// edges coincide (too many ties for the requested number of bins).
pub fn quantile_bins(values: &[f64], n_bins: usize) -> Result<Vec<Option<usize>>, MathError> {
    if n_bins == 0 {
        return Err(MathError::InvalidParameter("number of bins must be positive".to_string()));
    }

    let mut sorted: Vec<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
    if sorted.is_empty() {
        return Err(MathError::EmptyData);
    }
    sorted.sort_by(f64::total_cmp);

    let edges = (0..=n_bins)
        .map(|i| quantile(&sorted, i as f64 / n_bins as f64))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(pair) = edges.windows(2).find(|pair| pair[1] <= pair[0]) {
        return Err(MathError::InvalidParameter(format!(
            "bin edges must be unique, got duplicate edge {}",
            pair[1]
        )));
    }

    let upper = &edges[1..];
    Ok(values
        .iter()
        .map(|&x| (!x.is_nan()).then(|| upper.partition_point(|e| *e < x).min(n_bins - 1)))
        .collect())
}
