use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{TrackerError, TrackerResult};
use crate::types::ParsedDeploymentReport;

/// Suffix of the deployment artifact written for a run.
pub const ARTIFACT_SUFFIX: &str = "-deployments.json";

pub fn artifact_path(output_dir: &Path, base_name: &str) -> PathBuf {
    output_dir.join(format!("{base_name}{ARTIFACT_SUFFIX}"))
}

/// Writes the report as pretty-printed JSON, replacing any previous file at `destination`.
///
/// Returns `Ok(false)` without touching the filesystem when the report lists no deployment.
pub async fn persist(report: &ParsedDeploymentReport, destination: &Path) -> TrackerResult<bool> {
    if report.is_empty() {
        info!(path = %destination.display(), "No deployments to record, skipping artifact");
        return Ok(false);
    }

    let json = serde_json::to_string_pretty(report)?;

    if let Some(parent) = destination.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| TrackerError::io(parent, e))?;
    }

    // Write next to the destination then rename, so readers never observe a partial file.
    let mut staging = destination.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    tokio::fs::write(&staging, json).await.map_err(|e| TrackerError::io(&staging, e))?;
    if let Err(e) = tokio::fs::rename(&staging, destination).await {
        if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
            warn!(path = %staging.display(), error = %cleanup, "Failed to remove staging file");
        }
        return Err(TrackerError::io(destination, e));
    }

    info!(
        path = %destination.display(),
        networks = report.deployments.len(),
        contracts = report.contract_count(),
        "Deployment artifact written"
    );
    Ok(true)
}

pub async fn load_report(path: &Path) -> TrackerResult<ParsedDeploymentReport> {
    let content = tokio::fs::read(path).await.map_err(|e| TrackerError::io(path, e))?;
    Ok(serde_json::from_slice(&content)?)
}

/// Deletes the scratch log directory. Failures are logged, never returned.
pub async fn remove_scratch_dir(dir: &Path) {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => debug!(dir = %dir.display(), "Removed scratch log directory"),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(dir = %dir.display(), "Scratch log directory already gone")
        }
        Err(e) => warn!(dir = %dir.display(), error = %e, "Failed to remove scratch log directory"),
    }
}
