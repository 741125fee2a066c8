use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::config::TrackerPaths;
use crate::correlator::correlate;
use crate::error::{TrackerError, TrackerResult};
use crate::persister::{artifact_path, persist, remove_scratch_dir};
use crate::scanner::scan;
use crate::store::{load_snapshot, record_infrastructure, InfraStore};
use crate::types::{InfrastructureSnapshot, NetworkEnvironment, ParsedDeploymentReport, RunIdentity};

#[derive(Debug)]
pub struct ParseOutcome {
    pub report: ParsedDeploymentReport,
    /// Where the artifact was written, `None` when there was nothing to write.
    pub written_to: Option<PathBuf>,
}

/// Produces the deployment artifact of a run.
///
/// 1. loads the run's infrastructure snapshot (absent is fatal for this step)
/// 2. scans the build-tool logs
/// 3. groups the deployments per environment
/// 4. writes the artifact, unless it would be empty
/// 5. removes the scratch log directory
#[instrument(skip_all, fields(run = %identity.storage_key()))]
pub async fn parse_deployments(
    store: &dyn InfraStore,
    identity: &RunIdentity,
    paths: &TrackerPaths,
) -> TrackerResult<ParseOutcome> {
    let key = identity.storage_key();
    let snapshot = load_snapshot(store, &key).await;

    let records = scan(&paths.logs_dir).await?;
    let deployments = correlate(&records, snapshot.as_ref(), &key)?;
    let report = ParsedDeploymentReport::new(identity, deployments);

    let destination = artifact_path(&paths.output_dir, &key);
    let written_to = persist(&report, &destination).await?.then_some(destination);

    remove_scratch_dir(&paths.logs_dir).await;

    info!(
        records = records.len(),
        networks = report.deployments.len(),
        written = written_to.is_some(),
        "Deployment parsing finished"
    );
    Ok(ParseOutcome { report, written_to })
}

/// Records the environments listed in `networks_file` (a JSON array, in provisioning order) as the run's snapshot.
///
/// Only reading the file can fail; a storage fault is logged and yields `None`.
pub async fn record_infra(
    store: &dyn InfraStore,
    identity: &RunIdentity,
    networks_file: &Path,
) -> TrackerResult<Option<InfrastructureSnapshot>> {
    let content = tokio::fs::read(networks_file).await.map_err(|e| TrackerError::io(networks_file, e))?;
    let networks: Vec<NetworkEnvironment> = serde_json::from_slice(&content)?;

    Ok(record_infrastructure(store, identity, networks).await)
}
