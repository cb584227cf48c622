//! Error types for property file handling.

use scvi_resource::ResourceKind;
use thiserror::Error;

/// Errors that can occur while building a property set.
#[derive(Debug, Error)]
pub enum Error {
    /// Resource resolution error.
    #[error("{0}")]
    Resource(#[from] scvi_resource::Error),

    /// The document is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is JSON but not a property document.
    #[error("malformed property document at {key}: {reason}")]
    Malformed { key: String, reason: String },

    /// A `Type'Value'` reference did not split into type and value.
    #[error("invalid typed reference: {0:?}")]
    InvalidReference(String),

    /// A text or raw payload was given a numeric kind.
    #[error("{0} properties cannot hold text or raw JSON")]
    KindMismatch(ResourceKind),

    /// The parent chain revisits a material or exceeds the depth limit.
    #[error("parent cycle detected at {name} (depth {depth})")]
    CycleDetected { name: String, depth: usize },
}

impl Error {
    pub(crate) fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for property operations.
pub type Result<T> = std::result::Result<T, Error>;
