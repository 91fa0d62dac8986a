#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/eventca-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::WindowConfig;

mod builder;
pub use builder::build_windowed_returns;

mod align;
pub use align::{EventAligner, construct_event_windows};

mod error;
pub use error::WindowError;
