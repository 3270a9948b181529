//! Errors raised by the template engine
//!
//! Application failures are reported as data on `ApplicationResult`. The
//! variants here are contract violations and catalog loading failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("No backup available for rollback")]
    MissingBackup,

    #[error("Backup checksum mismatch: stored {stored}, computed {computed}")]
    BackupChecksumMismatch { stored: String, computed: String },

    #[error("Invalid template '{id}': {reason}")]
    InvalidTemplate { id: String, reason: String },

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed template JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, TemplateError>;
