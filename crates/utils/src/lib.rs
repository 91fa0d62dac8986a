#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/eventca-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod frame;
pub use frame::{ToFrame, events_from_frame, events_to_frame, returns_from_frame};

mod chart;
pub use chart::{
    component_time_series, conditional_cumulative_returns, conditional_distribution,
    loading_profile,
};

mod error;
pub use error::UtilsError;
