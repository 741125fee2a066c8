use std::path::PathBuf;

use thiserror::Error;

use crate::provisioner::ProvisionerError;
use crate::store::PersistenceError;

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Error types for the tracker
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Provisioner error: {0}")]
    Provisioner(#[from] ProvisionerError),

    /// Correlation requested without an infrastructure snapshot for the run.
    /// The provisioning step did not run, or its snapshot did not persist.
    #[error("No infrastructure snapshot found for run key {0}")]
    MissingSnapshot(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TrackerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
