#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/eventca-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{ComponentConfig, IndependentConfig, OrthogonalConfig};

mod pca;
pub use pca::OrthogonalDecomposer;

mod ica;
pub use ica::IndependentDecomposer;

mod pipeline;
pub use pipeline::{ComponentPipeline, Projection};

mod analysis;
pub use analysis::{ComponentArtifact, add_components, add_ics, add_pcs};

mod error;
pub use error::ComponentError;

/// Re-export commonly used types.
pub mod prelude {
    pub use eventca_traits::{Decomposition, Diagnostics, FittedTransform};

    pub use super::{ComponentArtifact, ComponentConfig, ComponentError, add_components};
}
