//! Tables behind the standard event-study charts.

use eventca_components::ComponentArtifact;
use eventca_math::{quantile, quantile_bins};
use eventca_primitives::OffsetLabel;
use polars::prelude::*;

use crate::{
    UtilsError,
    frame::{column, float_values},
};

/// Component loadings by relative day.
///
/// One row per offset (ascending as given), with an `offset` column and one
/// column per component (`PC1`, ...).
///
/// # Errors
/// Returns `DimensionMismatch` if the artifact width differs from the number of labels.
pub fn loading_profile(
    artifact: &ComponentArtifact,
    offset_labels: &[OffsetLabel],
) -> Result<DataFrame, UtilsError> {
    let loadings = artifact.loadings();
    if loadings.ncols() != offset_labels.len() {
        return Err(UtilsError::DimensionMismatch {
            expected: offset_labels.len(),
            actual: loadings.ncols(),
        });
    }

    let offsets: Vec<i64> = offset_labels.iter().map(|l| l.offset()).collect();
    let mut columns = vec![Column::new("offset".into(), offsets)];
    for (name, row) in artifact.names().iter().zip(loadings.rows()) {
        columns.push(Column::new(name.to_string().into(), row.to_vec()));
    }
    Ok(DataFrame::new(columns)?)
}

fn bin_label(bin: u32, n_bins: usize) -> String {
    match (n_bins, bin) {
        (3, 0) => "Low".to_string(),
        (3, 1) => "Medium".to_string(),
        (3, 2) => "High".to_string(),
        _ => format!("Bin {bin}"),
    }
}

/// Mean cumulative return path per quantile bin of a score column.
///
/// Rows are split into `n_bins` equal-frequency bins of `score_col`, every
/// offset column is averaged per bin, and each bin's value at the middle
/// offset (the event day) is subtracted so all paths cross zero there. Rows
/// with a missing score are ignored.
///
/// # Returns
/// Frame with `bin`, `label` (`Low`/`Medium`/`High` for three bins, else
/// `Bin i`), and one column per offset.
///
/// # Errors
/// Returns an error if a column is missing, `n_bins` is zero, there are no
/// offsets, or the score has too many ties for distinct bin edges.
pub fn conditional_cumulative_returns(
    frame: &DataFrame,
    offset_labels: &[OffsetLabel],
    score_col: &str,
    n_bins: usize,
) -> Result<DataFrame, UtilsError> {
    if offset_labels.is_empty() {
        return Err(UtilsError::InvalidParameter("no offset columns given".to_string()));
    }
    if n_bins == 0 {
        return Err(UtilsError::InvalidParameter("number of bins must be positive".to_string()));
    }

    let names: Vec<String> = offset_labels.iter().map(ToString::to_string).collect();
    let bins: Vec<Option<u32>> = quantile_bins(&float_values(frame, score_col)?, n_bins)?
        .into_iter()
        .map(|b| b.map(|b| b as u32))
        .collect();

    let mut columns = vec![Column::new("bin".into(), bins)];
    for name in &names {
        columns.push(column(frame, name)?.cast(&DataType::Float64)?);
    }

    let middle = names[names.len() / 2].as_str();
    let means = DataFrame::new(columns)?
        .lazy()
        .filter(col("bin").is_not_null())
        .group_by([col("bin")])
        .agg(names.iter().map(|n| col(n.as_str()).mean()).collect::<Vec<_>>())
        .sort(["bin"], SortMultipleOptions::default())
        .with_columns(
            names
                .iter()
                .map(|n| (col(n.as_str()) - col(middle)).alias(n.as_str()))
                .collect::<Vec<_>>(),
        )
        .collect()?;

    let bin_ids: Vec<u32> =
        means.column("bin")?.as_materialized_series().u32()?.into_iter().flatten().collect();
    let labels: Vec<String> = bin_ids.iter().map(|&b| bin_label(b, n_bins)).collect();

    let mut output = vec![Column::new("bin".into(), bin_ids), Column::new("label".into(), labels)];
    for name in &names {
        output.push(means.column(name)?.clone());
    }
    Ok(DataFrame::new(output)?)
}

/// Score columns over time.
///
/// Rows are sorted by `date_col`. Values are optionally replaced by their
/// absolute value, then optionally smoothed by a trailing rolling mean of
/// `rolling_window` rows (null for the first `rolling_window - 1` rows).
///
/// # Errors
/// Returns an error if a column is missing or `rolling_window` is zero.
pub fn component_time_series(
    frame: &DataFrame,
    date_col: &str,
    cols: &[&str],
    rolling_window: Option<usize>,
    abs: bool,
) -> Result<DataFrame, UtilsError> {
    if rolling_window == Some(0) {
        return Err(UtilsError::InvalidParameter("rolling window must be positive".to_string()));
    }
    for name in std::iter::once(&date_col).chain(cols) {
        column(frame, name)?;
    }

    let mut exprs = vec![col(date_col)];
    for &name in cols {
        let mut expr = col(name).cast(DataType::Float64);
        if abs {
            expr = expr.abs();
        }
        if let Some(window) = rolling_window {
            expr = expr.rolling_mean(RollingOptionsFixedWindow {
                window_size: window,
                min_periods: window,
                ..Default::default()
            });
        }
        exprs.push(expr.alias(name));
    }

    Ok(frame
        .clone()
        .lazy()
        .sort([date_col], SortMultipleOptions::new().with_maintain_order(true))
        .select(exprs)
        .collect()?)
}

/// Five-number summary of each column per group.
///
/// Groups are visited in sorted order; rows with a null group or a missing
/// value are skipped. Each output row is labeled `"{col}_{group}"`.
///
/// # Returns
/// Frame with `column`, `group`, `label`, `count`, `mean`, `min`, `q25`,
/// `median`, `q75`, `max`. Statistics of an all-missing group are `NaN`.
///
/// # Errors
/// Returns an error if a column is missing.
pub fn conditional_distribution(
    frame: &DataFrame,
    group_col: &str,
    cols: &[&str],
) -> Result<DataFrame, UtilsError> {
    column(frame, group_col)?;

    let mut names = Vec::new();
    let mut groups = Vec::new();
    let mut counts = Vec::new();
    let mut stats: [Vec<f64>; 6] = Default::default();

    for &name in cols {
        column(frame, name)?;
        let grouped = frame
            .clone()
            .lazy()
            .group_by([col(group_col)])
            .agg([col(name).cast(DataType::Float64).alias("values")])
            .sort([group_col], SortMultipleOptions::default())
            .collect()?;

        let keys = grouped.column(group_col)?.cast(&DataType::String)?;
        let keys = keys.as_materialized_series().str()?;
        let values = grouped.column("values")?.as_materialized_series().list()?;

        for (key, series) in keys.into_iter().zip(values.into_iter()) {
            let Some(key) = key else { continue };
            let mut sorted: Vec<f64> = match series {
                Some(series) => {
                    series.f64()?.into_iter().flatten().filter(|v| !v.is_nan()).collect()
                }
                None => Vec::new(),
            };
            sorted.sort_by(f64::total_cmp);

            names.push(name.to_string());
            groups.push(key.to_string());
            counts.push(sorted.len() as u32);
            for (slot, value) in stats.iter_mut().zip(summarize(&sorted)?) {
                slot.push(value);
            }
        }
    }

    let labels: Vec<String> = names.iter().zip(&groups).map(|(c, g)| format!("{c}_{g}")).collect();
    let [mean, min, q25, median, q75, max] = stats;

    Ok(DataFrame::new(vec![
        Column::new("column".into(), names),
        Column::new("group".into(), groups),
        Column::new("label".into(), labels),
        Column::new("count".into(), counts),
        Column::new("mean".into(), mean),
        Column::new("min".into(), min),
        Column::new("q25".into(), q25),
        Column::new("median".into(), median),
        Column::new("q75".into(), q75),
        Column::new("max".into(), max),
    ])?)
}

/// Mean, min, quartiles, and max of sorted values.
fn summarize(sorted: &[f64]) -> Result<[f64; 6], UtilsError> {
    if sorted.is_empty() {
        return Ok([f64::NAN; 6]);
    }
    let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
    Ok([
        mean,
        quantile(sorted, 0.0)?,
        quantile(sorted, 0.25)?,
        quantile(sorted, 0.5)?,
        quantile(sorted, 0.75)?,
        quantile(sorted, 1.0)?,
    ])
}
