//! Typed error variants for the trade-gate-config crate.
//!
//! Callers that only need a message can coerce these into `anyhow::Error`;
//! callers that care about the failure mode can match on the variant.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or saving INI-style settings files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read settings file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file (or its temp sibling) could not be written or renamed.
    #[error("failed to write settings file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The parent directory for a settings file could not be created.
    #[error("failed to create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No platform data directory could be resolved and none was supplied.
    #[error("unable to resolve a data directory for trade-gate")]
    DataDirUnavailable,
}
