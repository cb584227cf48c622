//! Error types for resource resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when resolving or reading resources.
///
/// A resource that simply does not exist is not an error; resolution
/// reports it as `None`.
#[derive(Debug, Error)]
pub enum Error {
    /// The resource was found but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Resolver configuration file could not be parsed.
    #[error("invalid resolver config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type for resource operations.
pub type Result<T> = std::result::Result<T, Error>;
