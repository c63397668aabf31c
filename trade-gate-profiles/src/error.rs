//! Typed errors for profile storage.

use std::path::PathBuf;
use thiserror::Error;
use trade_gate_config::ConfigError;

#[derive(Debug, Error)]
pub enum ProfileError {
    /// Reading or writing a settings file failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A directory or marker operation failed.
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested settings file does not exist.
    #[error("profile settings file `{0}` not found")]
    NotFound(String),

    /// Another process holds the profile's lock marker.
    #[error("profile `{0}` is already in use by another instance")]
    Locked(String),
}
