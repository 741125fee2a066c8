use clap::Args;

/// Identity of the pipeline run, as exported by the CI environment.
#[derive(Debug, Clone, Args)]
pub struct RunCliArgs {
    /// Name of the workflow
    #[arg(env = "GITHUB_WORKFLOW", long)]
    pub workflow: String,

    /// Sequential number of this workflow run
    #[arg(env = "GITHUB_RUN_NUMBER", long)]
    pub run_number: u64,

    /// Unique id of this workflow run
    #[arg(env = "GITHUB_RUN_ID", long)]
    pub run_id: u64,

    /// Job name inside the workflow
    #[arg(env = "GITHUB_JOB", long)]
    pub job: String,
}

/// Filesystem locations used by the tracker.
#[derive(Debug, Clone, Args)]
pub struct WorkspaceCliArgs {
    /// Root of the checked out repository
    #[arg(env = "GITHUB_WORKSPACE", long, default_value = ".")]
    pub workspace: std::path::PathBuf,

    /// Scratch directory holding the build-tool logs. Defaults to `<workspace>/.tenderly/logs`
    #[arg(env = "VNET_TRACKER_LOGS_DIR", long)]
    pub logs_dir: Option<std::path::PathBuf>,

    /// Directory receiving the deployment artifact. Defaults to `<workspace>/.tenderly/deployments`
    #[arg(env = "VNET_TRACKER_OUTPUT_DIR", long)]
    pub output_dir: Option<std::path::PathBuf>,
}
