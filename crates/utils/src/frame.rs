//! Conversions between polars frames and event-study tables.

use std::collections::HashSet;

use chrono::Datelike;
use eventca_primitives::{
    ALIGNED_DATE_COLUMN, AlignedEvents, ColumnData, DATE_COLUMN, Date, EventTable,
    LOG_RETURN_COLUMN, ReturnSeries, ScoredEvents,
};
use polars::prelude::*;

use crate::UtilsError;

/// Days from 0001-01-01 to 1970-01-01, the polars `Date` origin.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub(crate) fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, UtilsError> {
    df.column(name).map_err(|_| UtilsError::MissingColumn(name.to_string()))
}

/// Column values as `f64`, with nulls mapped to `NaN`.
pub(crate) fn float_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, UtilsError> {
    let values = column(df, name)?.cast(&DataType::Float64)?;
    Ok(values
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

fn parse_date(text: &str) -> Result<Date, UtilsError> {
    Date::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| UtilsError::InvalidParameter(format!("cannot parse date {text:?}: {e}")))
}

fn from_epoch_days(days: i32) -> Result<Date, UtilsError> {
    Date::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
        .ok_or_else(|| UtilsError::InvalidParameter(format!("date out of range: {days} days")))
}

/// Column values as dates. Accepts `Date`, `Datetime`, and `YYYY-MM-DD` strings.
pub(crate) fn date_values(df: &DataFrame, name: &str) -> Result<Vec<Option<Date>>, UtilsError> {
    let source = column(df, name)?;
    let days = match source.dtype() {
        DataType::String => {
            return source
                .as_materialized_series()
                .str()?
                .into_iter()
                .map(|v| v.map(parse_date).transpose())
                .collect();
        }
        DataType::Date => source.cast(&DataType::Int32)?,
        DataType::Datetime(..) => source.cast(&DataType::Date)?.cast(&DataType::Int32)?,
        other => {
            return Err(UtilsError::InvalidParameter(format!(
                "column {name} has dtype {other}, expected a date"
            )));
        }
    };

    days.as_materialized_series()
        .i32()?
        .into_iter()
        .map(|v| v.map(from_epoch_days).transpose())
        .collect()
}

fn required_dates(df: &DataFrame, name: &str) -> Result<Vec<Date>, UtilsError> {
    date_values(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, d)| {
            d.ok_or_else(|| {
                UtilsError::InvalidParameter(format!("column {name} is null at row {row}"))
            })
        })
        .collect()
}

fn date_column(
    name: &str,
    dates: impl IntoIterator<Item = Option<Date>>,
) -> Result<Column, UtilsError> {
    let days: Vec<Option<i32>> = dates
        .into_iter()
        .map(|d| d.map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE))
        .collect();
    Ok(Column::new(name.into(), days).cast(&DataType::Date)?)
}

fn metadata_values(source: &Column) -> Result<ColumnData, UtilsError> {
    let dtype = source.dtype();
    let data = if dtype.is_float() {
        let values = source.cast(&DataType::Float64)?;
        ColumnData::Float(values.as_materialized_series().f64()?.into_iter().collect())
    } else if dtype.is_integer() {
        let values = source.cast(&DataType::Int64)?;
        ColumnData::Int(values.as_materialized_series().i64()?.into_iter().collect())
    } else {
        match dtype {
            DataType::Boolean => {
                ColumnData::Bool(source.as_materialized_series().bool()?.into_iter().collect())
            }
            DataType::Date | DataType::Datetime(..) => {
                let days = source.cast(&DataType::Date)?.cast(&DataType::Int32)?;
                ColumnData::Date(
                    days.as_materialized_series()
                        .i32()?
                        .into_iter()
                        .map(|v| v.map(from_epoch_days).transpose())
                        .collect::<Result<_, _>>()?,
                )
            }
            _ => {
                let values = source.cast(&DataType::String)?;
                ColumnData::Text(
                    values
                        .as_materialized_series()
                        .str()?
                        .into_iter()
                        .map(|v| v.map(str::to_string))
                        .collect(),
                )
            }
        }
    };
    Ok(data)
}

fn metadata_column(name: &str, data: &ColumnData) -> Result<Column, UtilsError> {
    match data {
        ColumnData::Float(v) => Ok(Column::new(name.into(), v)),
        ColumnData::Int(v) => Ok(Column::new(name.into(), v)),
        ColumnData::Text(v) => Ok(Column::new(name.into(), v)),
        ColumnData::Bool(v) => Ok(Column::new(name.into(), v)),
        ColumnData::Date(v) => date_column(name, v.iter().copied()),
    }
}

/// Build a return series from a frame with one row per trading date.
///
/// Rows are sorted by date; a null return is kept as `NaN` (missing).
///
/// # Errors
/// Returns an error if a column is missing, a date is null or unparseable, or a
/// date appears twice.
pub fn returns_from_frame(
    df: &DataFrame,
    date_col: &str,
    return_col: &str,
) -> Result<ReturnSeries, UtilsError> {
    let dates = required_dates(df, date_col)?;
    let returns = float_values(df, return_col)?;
    Ok(ReturnSeries::from_unsorted(dates.into_iter().zip(returns).collect())?)
}

/// Build an event table from a frame with an event date column.
///
/// Every other column is kept as typed metadata: floats, integers, booleans,
/// and dates keep their type; anything else is cast to text.
///
/// # Errors
/// Returns an error if the date column is missing or has null or unparseable
/// values, or a metadata column is named like the event date column.
pub fn events_from_frame(df: &DataFrame, date_col: &str) -> Result<EventTable, UtilsError> {
    let mut table = EventTable::new(required_dates(df, date_col)?);
    for source in df.get_columns() {
        let name = source.name().as_str();
        if name == date_col {
            continue;
        }
        table = table.with_column(name, metadata_values(source)?)?;
    }
    Ok(table)
}

/// Tables that can be written out as a polars frame.
pub trait ToFrame {
    /// Convert to a `DataFrame`.
    ///
    /// # Errors
    /// Returns an error if a metadata column name clashes with a generated
    /// column or polars rejects a column.
    fn to_frame(&self) -> Result<DataFrame, UtilsError>;
}

fn event_columns(table: &EventTable) -> Result<Vec<Column>, UtilsError> {
    let mut columns = vec![date_column(DATE_COLUMN, table.dates().iter().copied().map(Some))?];
    for meta in table.columns() {
        columns.push(metadata_column(&meta.name, &meta.data)?);
    }
    Ok(columns)
}

fn aligned_columns(aligned: &AlignedEvents) -> Result<Vec<Column>, UtilsError> {
    let mut columns = event_columns(aligned.events())?;
    let aligned_dates = aligned.aligned_dates().iter().copied().map(Some);
    columns.push(date_column(ALIGNED_DATE_COLUMN, aligned_dates)?);
    columns.push(Column::new(LOG_RETURN_COLUMN.into(), aligned.aligned_returns()));
    for (label, values) in aligned.offsets().iter().zip(aligned.values().columns()) {
        columns.push(Column::new(label.to_string().into(), values.to_vec()));
    }
    Ok(columns)
}

/// Assemble a frame, rejecting metadata that collides with a generated column.
fn unique_frame(columns: Vec<Column>) -> Result<DataFrame, UtilsError> {
    let mut seen = HashSet::with_capacity(columns.len());
    if let Some(clash) = columns.iter().map(Column::name).find(|name| !seen.insert(*name)) {
        return Err(UtilsError::InvalidParameter(format!(
            "metadata column {:?} collides with a generated column",
            clash.as_str()
        )));
    }
    Ok(DataFrame::new(columns)?)
}

impl ToFrame for EventTable {
    fn to_frame(&self) -> Result<DataFrame, UtilsError> {
        unique_frame(event_columns(self)?)
    }
}

impl ToFrame for AlignedEvents {
    fn to_frame(&self) -> Result<DataFrame, UtilsError> {
        unique_frame(aligned_columns(self)?)
    }
}

impl ToFrame for ScoredEvents {
    fn to_frame(&self) -> Result<DataFrame, UtilsError> {
        let mut columns = aligned_columns(self.aligned())?;
        for (name, values) in self.names().iter().zip(self.scores().columns()) {
            columns.push(Column::new(name.to_string().into(), values.to_vec()));
        }
        unique_frame(columns)
    }
}

/// Convert events (plain, aligned, or scored) to a frame.
///
/// Columns are `Date`, the metadata columns, then for aligned events
/// `aligned_date`, `Log Return`, and one column per offset, then any score
/// columns.
///
/// # Errors
/// Returns `InvalidParameter` if a metadata column shares its name with a
/// generated column, or an error if polars rejects a column.
pub fn events_to_frame<T: ToFrame + ?Sized>(events: &T) -> Result<DataFrame, UtilsError> {
    events.to_frame()
}
