use std::process::ExitCode;

use clap::Parser as _;
use dotenvy::dotenv;
use tracing::error;
use vnet_tracker::cleanup::{self, CleanupOptions};
use vnet_tracker::cli::{Cli, Commands, RunCliArgs, TenderlyCliArgs, WorkspaceCliArgs};
use vnet_tracker::config::{TenderlyParams, TrackerPaths};
use vnet_tracker::pipeline::{parse_deployments, record_infra};
use vnet_tracker::provisioner::TenderlyClient;
use vnet_tracker::utils::logging::init_logging;
use vnet_tracker::TrackerResult;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    init_logging();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::RecordInfra { networks_file, run, workspace } => {
            let paths = TrackerPaths::from(workspace);
            record_infra(&paths.infra_store(), &run.into(), networks_file).await.map(|_| ())
        }
        Commands::ParseDeployments { run, workspace } => {
            let paths = TrackerPaths::from(workspace);
            parse_deployments(&paths.infra_store(), &run.into(), &paths).await.map(|_| ())
        }
        Commands::Cleanup { parse_deployments, delete_snapshot, run, workspace, tenderly } => {
            let options = CleanupOptions { parse_deployments: *parse_deployments, delete_snapshot: *delete_snapshot };
            run_cleanup(run, workspace, tenderly, options).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, error_chain = ?e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run_cleanup(
    run: &RunCliArgs,
    workspace: &WorkspaceCliArgs,
    tenderly: &TenderlyCliArgs,
    options: CleanupOptions,
) -> TrackerResult<()> {
    let params = TenderlyParams::try_from(tenderly)?;
    let client = TenderlyClient::new(params);
    let paths = TrackerPaths::from(workspace);

    cleanup::run(&client, &paths.infra_store(), &run.into(), &paths, options).await?;
    Ok(())
}
