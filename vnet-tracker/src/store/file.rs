use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, trace};

use super::{InfraStore, PersistenceError};
use crate::types::InfrastructureSnapshot;

/// Directory under the workspace holding everything the tracker writes.
pub const TRACKER_DIR: &str = ".tenderly";
/// Subdirectory of [`TRACKER_DIR`] holding one snapshot per run.
pub const INFRA_SUBDIR: &str = "infra";

/// Snapshot store backed by one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileInfraStore {
    root: PathBuf,
}

impl FileInfraStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store at the conventional location inside a CI workspace.
    pub fn in_workspace(workspace: &Path) -> Self {
        Self::new(workspace.join(TRACKER_DIR).join(INFRA_SUBDIR))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

#[async_trait]
impl InfraStore for FileInfraStore {
    async fn read(&self, key: &str) -> Result<Option<InfrastructureSnapshot>, PersistenceError> {
        let path = self.path_for(key);
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!(path = %path.display(), "No infrastructure snapshot stored");
                return Ok(None);
            }
            Err(source) => return Err(PersistenceError::Read { path, source }),
        };

        match serde_json::from_slice(&content) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Ignoring undecodable infrastructure snapshot");
                Ok(None)
            }
        }
    }

    async fn write(&self, key: &str, snapshot: &InfrastructureSnapshot) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        let json = serde_json::to_string_pretty(snapshot)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| PersistenceError::Write { path: self.root.clone(), source })?;
        tokio::fs::write(&path, json).await.map_err(|source| PersistenceError::Write { path: path.clone(), source })?;

        debug!(path = %path.display(), "Infrastructure snapshot written");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistenceError::Delete { path, source }),
        }
    }
}
