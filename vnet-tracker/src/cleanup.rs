use futures::future::join_all;
use tracing::{info, instrument, warn};

use crate::config::TrackerPaths;
use crate::error::TrackerResult;
use crate::pipeline::parse_deployments;
use crate::provisioner::{ProvisionerError, VnetClient};
use crate::store::{load_snapshot, InfraStore};
use crate::types::{InfrastructureSnapshot, RunIdentity};

/// Optional stages of the `cleanup` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanupOptions {
    pub parse_deployments: bool,
    pub delete_snapshot: bool,
}

/// Outcome of pausing every environment of a run.
#[derive(Debug, Default)]
pub struct TeardownReport {
    /// Ids of the environments that were paused
    pub paused: Vec<String>,
    pub failed: Vec<(String, ProvisionerError)>,
}

impl TeardownReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Pauses every environment of the snapshot concurrently.
///
/// A failing pause never cancels its siblings: every result is collected.
pub async fn pause_all(client: &dyn VnetClient, snapshot: &InfrastructureSnapshot) -> TeardownReport {
    let pauses = snapshot.environments().map(|environment| async move {
        let result = client.pause(environment).await;
        (environment, result)
    });

    let mut report = TeardownReport::default();
    for (environment, result) in join_all(pauses).await {
        match result {
            Ok(()) => {
                info!(vnet_id = %environment.id, slug = %environment.testnet_slug, "Paused virtual testnet");
                report.paused.push(environment.id.clone());
            }
            Err(e) => {
                warn!(
                    vnet_id = %environment.id,
                    slug = %environment.testnet_slug,
                    error = %e,
                    "Failed to pause virtual testnet"
                );
                report.failed.push((environment.id.clone(), e));
            }
        }
    }
    report
}

/// Tears a run down: pauses every recorded environment, then optionally parses the deployment logs, then
/// optionally deletes the snapshot.
///
/// Pauses and snapshot deletion are best-effort. A failing parse stage is returned only once every other stage ran.
#[instrument(skip_all, fields(run = %identity.storage_key()))]
pub async fn run(
    client: &dyn VnetClient,
    store: &dyn InfraStore,
    identity: &RunIdentity,
    paths: &TrackerPaths,
    options: CleanupOptions,
) -> TrackerResult<TeardownReport> {
    let key = identity.storage_key();

    let report = match load_snapshot(store, &key).await {
        Some(snapshot) => pause_all(client, &snapshot).await,
        None => {
            warn!(key = %key, "No infrastructure snapshot for this run, nothing to pause");
            TeardownReport::default()
        }
    };
    info!(paused = report.paused.len(), failed = report.failed.len(), "Teardown finished");

    let parsed = if options.parse_deployments {
        parse_deployments(store, identity, paths).await.map(|_| ())
    } else {
        Ok(())
    };

    if options.delete_snapshot {
        if let Err(e) = store.delete(&key).await {
            warn!(key = %key, error = %e, "Failed to delete infrastructure snapshot");
        }
    }

    parsed.map(|()| report)
}
