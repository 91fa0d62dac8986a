//! Event table definitions.

use serde::{Deserialize, Serialize};

use crate::{DATE_COLUMN, Date, PrimitiveError};

/// Values of a single metadata column. Every variant is nullable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    /// Floating point values.
    Float(Vec<Option<f64>>),
    /// Integer values.
    Int(Vec<Option<i64>>),
    /// Text values.
    Text(Vec<Option<String>>),
    /// Boolean values.
    Bool(Vec<Option<bool>>),
    /// Calendar dates.
    Date(Vec<Option<Date>>),
}

impl ColumnData {
    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Text(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::Date(v) => v.len(),
        }
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Select rows by position, in the given order.
    ///
    /// # Panics
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn take(&self, indices: &[usize]) -> Self {
        fn pick<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| values[i].clone()).collect()
        }

        match self {
            Self::Float(v) => Self::Float(pick(v, indices)),
            Self::Int(v) => Self::Int(pick(v, indices)),
            Self::Text(v) => Self::Text(pick(v, indices)),
            Self::Bool(v) => Self::Bool(pick(v, indices)),
            Self::Date(v) => Self::Date(pick(v, indices)),
        }
    }
}

/// A named metadata column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Column values.
    pub data: ColumnData,
}

impl Column {
    /// Create a new column.
    #[must_use]
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self { name: name.into(), data }
    }
}

/// Events keyed by date, carrying arbitrary caller metadata.
///
/// Row order is whatever the caller supplied; the pipeline sorts a copy when it
/// needs chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTable {
    dates: Vec<Date>,
    columns: Vec<Column>,
}

impl EventTable {
    /// Create an event table with no metadata columns.
    #[must_use]
    pub const fn new(dates: Vec<Date>) -> Self {
        Self { dates, columns: Vec::new() }
    }

    /// Add a metadata column.
    ///
    /// # Errors
    /// Returns an error if the length differs from the number of events or the
    /// name is already taken.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        data: ColumnData,
    ) -> Result<Self, PrimitiveError> {
        let name = name.into();
        if data.len() != self.dates.len() {
            return Err(PrimitiveError::LengthMismatch {
                context: name,
                expected: self.dates.len(),
                actual: data.len(),
            });
        }
        if name == DATE_COLUMN || self.column(&name).is_some() {
            return Err(PrimitiveError::DuplicateColumn(name));
        }
        self.columns.push(Column::new(name, data));
        Ok(self)
    }

    /// Number of events.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Event dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Metadata columns, in insertion order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a metadata column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Select rows by position, in the given order.
    ///
    /// # Panics
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn take(&self, indices: &[usize]) -> Self {
        Self {
            dates: indices.iter().map(|&i| self.dates[i]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.data.take(indices)))
                .collect(),
        }
    }

    /// Row positions in ascending date order. Ties keep their original order.
    #[must_use]
    pub fn chronological_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.dates.len()).collect();
        order.sort_by_key(|&i| self.dates[i]);
        order
    }
}
