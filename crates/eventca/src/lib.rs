//! # eventca
//!
//! Event-study component analysis in Rust.
//!
//! This crate provides a unified interface to the eventca ecosystem: event
//! windows of cumulative abnormal returns, and principal or independent
//! components fitted over those windows. Individual components can be enabled
//! via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Core type definitions
//! - `traits`: Trait abstractions
//! - `math`: Numerical building blocks
//! - `window`: Return windows and event alignment
//! - `components`: PCA and FastICA over aligned events
//! - `utils`: Polars interop and chart data
//! - `cli`: The `event-study` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use eventca::{components::add_pcs, window::{WindowConfig, construct_event_windows}};
//!
//! let (aligned, labels) = construct_event_windows(&events, &returns, &WindowConfig::default())?;
//! let (scored, artifact) = add_pcs(&aligned, &labels, 3)?;
//! ```

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/eventca-rs/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use eventca_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use eventca_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use eventca_math as math;
#[cfg(feature = "window")]
#[doc(inline)]
pub use eventca_window as window;
#[cfg(feature = "components")]
#[doc(inline)]
pub use eventca_components as components;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use eventca_utils as utils;

// Used by the `event-study` binary only.
#[cfg(feature = "cli")]
use {clap as _, polars as _, tracing as _, tracing_subscriber as _};
