use std::path::PathBuf;

use url::Url;

use crate::cli::{RunCliArgs, TenderlyCliArgs, WorkspaceCliArgs};
use crate::error::TrackerError;
use crate::store::file::TRACKER_DIR;
use crate::store::FileInfraStore;
use crate::types::RunIdentity;

const LOGS_SUBDIR: &str = "logs";
const DEPLOYMENTS_SUBDIR: &str = "deployments";

impl From<&RunCliArgs> for RunIdentity {
    fn from(args: &RunCliArgs) -> Self {
        Self { workflow: args.workflow.clone(), run_id: args.run_id, run_number: args.run_number, job: args.job.clone() }
    }
}

/// Resolved filesystem layout of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerPaths {
    pub workspace: PathBuf,
    pub logs_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl TrackerPaths {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        let workspace = workspace.into();
        let tracker_dir = workspace.join(TRACKER_DIR);
        Self { logs_dir: tracker_dir.join(LOGS_SUBDIR), output_dir: tracker_dir.join(DEPLOYMENTS_SUBDIR), workspace }
    }

    pub fn infra_store(&self) -> FileInfraStore {
        FileInfraStore::in_workspace(&self.workspace)
    }
}

impl From<&WorkspaceCliArgs> for TrackerPaths {
    fn from(args: &WorkspaceCliArgs) -> Self {
        let defaults = Self::new(&args.workspace);
        Self {
            logs_dir: args.logs_dir.clone().unwrap_or(defaults.logs_dir),
            output_dir: args.output_dir.clone().unwrap_or(defaults.output_dir),
            workspace: defaults.workspace,
        }
    }
}

/// Validated parameters of the Tenderly API client.
#[derive(Clone)]
pub struct TenderlyParams {
    pub api_url: Url,
    pub access_key: String,
    pub account: String,
    pub project: String,
}

impl std::fmt::Debug for TenderlyParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenderlyParams")
            .field("api_url", &self.api_url.as_str())
            .field("access_key", &"<redacted>")
            .field("account", &self.account)
            .field("project", &self.project)
            .finish()
    }
}

impl TryFrom<&TenderlyCliArgs> for TenderlyParams {
    type Error = TrackerError;

    fn try_from(args: &TenderlyCliArgs) -> Result<Self, Self::Error> {
        let required = |value: &Option<String>, name: &str| {
            value
                .clone()
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| TrackerError::Config(format!("{name} is required to pause virtual testnets")))
        };

        Ok(Self {
            api_url: args.tenderly_api_url.clone(),
            access_key: required(&args.tenderly_access_key, "TENDERLY_ACCESS_KEY")?,
            account: required(&args.tenderly_account, "TENDERLY_ACCOUNT_NAME")?,
            project: required(&args.tenderly_project, "TENDERLY_PROJECT_NAME")?,
        })
    }
}
