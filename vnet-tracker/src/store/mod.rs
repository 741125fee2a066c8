pub mod error;
pub mod file;

use async_trait::async_trait;
pub use error::PersistenceError;
pub use file::FileInfraStore;
use tracing::{info, warn};

use crate::types::{InfrastructureSnapshot, NetworkEnvironment, RunIdentity};

/// Key/value persistence of infrastructure snapshots across pipeline steps.
///
/// Each step of a run is a fresh process, so there is no in-process cache: every read goes to the medium.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InfraStore: Send + Sync {
    /// Returns `Ok(None)` when nothing was stored under `key`, or when the stored content cannot be decoded.
    async fn read(&self, key: &str) -> Result<Option<InfrastructureSnapshot>, PersistenceError>;

    /// Overwrites any snapshot previously stored under `key`.
    async fn write(&self, key: &str, snapshot: &InfrastructureSnapshot) -> Result<(), PersistenceError>;

    /// Removing a key that does not exist is not an error.
    async fn delete(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Derives the storage key of a run.
///
/// The key only contains `[a-z0-9-]`: separators and whitespace become hyphens, anything else is dropped.
pub fn key_for_run(workflow: &str, run_number: &str, job: &str) -> String {
    let raw = format!("{workflow}-{run_number}-{job}");
    let mut key = String::with_capacity(raw.len());

    for c in raw.chars().flat_map(char::to_lowercase) {
        let mapped = match c {
            'a'..='z' | '0'..='9' => Some(c),
            '-' | '_' | '.' | '/' | '\\' => Some('-'),
            c if c.is_whitespace() => Some('-'),
            _ => None,
        };
        match mapped {
            Some('-') if key.is_empty() || key.ends_with('-') => {}
            Some(c) => key.push(c),
            None => {}
        }
    }

    let key = key.trim_end_matches('-');
    if key.is_empty() {
        "run".to_string()
    } else {
        key.to_string()
    }
}

impl RunIdentity {
    pub fn storage_key(&self) -> String {
        key_for_run(&self.workflow, &self.run_number.to_string(), &self.job)
    }
}

/// Reads the snapshot of a run, downgrading storage faults to "absent".
pub async fn load_snapshot(store: &dyn InfraStore, key: &str) -> Option<InfrastructureSnapshot> {
    match store.read(key).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to read infrastructure snapshot, treating it as absent");
            None
        }
    }
}

/// Persists the environments provisioned by the current run.
///
/// Provisioning already succeeded when this is called, so a storage failure is logged and swallowed.
pub async fn record_infrastructure(
    store: &dyn InfraStore,
    identity: &RunIdentity,
    networks: Vec<NetworkEnvironment>,
) -> Option<InfrastructureSnapshot> {
    let key = identity.storage_key();
    let snapshot = InfrastructureSnapshot::new(identity.clone(), networks);

    match store.write(&key, &snapshot).await {
        Ok(()) => {
            info!(key = %key, networks = snapshot.networks.len(), "Recorded infrastructure snapshot");
            Some(snapshot)
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to record infrastructure snapshot");
            None
        }
    }
}
