//! Component naming.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Decomposition applied to the abnormal-return matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentMethod {
    /// Orthogonal, variance-maximizing components (PCA).
    #[default]
    #[display("pca")]
    Orthogonal,
    /// Statistically independent sources (FastICA).
    #[display("ica")]
    IndependentSource,
}

impl ComponentMethod {
    /// Column prefix for score columns.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Orthogonal => "PC",
            Self::IndependentSource => "IC",
        }
    }
}

/// Name of a score column, 1-indexed (`PC1`, `IC3`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{}{}", method.prefix(), index)]
pub struct ComponentName {
    /// Decomposition that produced the component.
    pub method: ComponentMethod,
    /// 1-based component index.
    pub index: usize,
}

impl ComponentName {
    /// Create a component name.
    #[must_use]
    pub const fn new(method: ComponentMethod, index: usize) -> Self {
        Self { method, index }
    }

    /// Names `1..=k` for a method.
    #[must_use]
    pub fn sequence(method: ComponentMethod, k: usize) -> Vec<Self> {
        (1..=k).map(|i| Self::new(method, i)).collect()
    }
}
