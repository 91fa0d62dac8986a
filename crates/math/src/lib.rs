#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/eventca-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod expanding;
pub use expanding::{ExpandingMean, expanding_demean};

mod scaler;
pub use scaler::StandardScaler;

mod linalg;
pub use linalg::{
    DEFAULT_EIGEN_SWEEPS, DEFAULT_EIGEN_TOLERANCE, SymmetricEigen, covariance, inverse_sqrt,
    pseudo_inverse, symmetric_eigen,
};

mod quantile;
pub use quantile::{quantile, quantile_bins};

mod error;
pub use error::MathError;
