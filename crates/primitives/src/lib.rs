#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/eventca-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::PrimitiveError;

mod events;
pub use events::{Column, ColumnData, EventTable};

mod returns;
pub use returns::ReturnSeries;

mod window;
pub use window::{OffsetLabel, WindowedReturns};

mod aligned;
pub use aligned::{AlignedEvents, ScoredEvents};

mod component;
pub use component::{ComponentMethod, ComponentName};

/// Re-export common date type.
pub type Date = chrono::NaiveDate;

/// Name of the event date column.
pub const DATE_COLUMN: &str = "Date";

/// Name of the column holding the raw log return of the matched window row.
pub const LOG_RETURN_COLUMN: &str = "Log Return";

/// Name of the column holding the matched window row's date.
pub const ALIGNED_DATE_COLUMN: &str = "aligned_date";
