use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod run;
pub mod tenderly;

pub use run::{RunCliArgs, WorkspaceCliArgs};
pub use tenderly::TenderlyCliArgs;

#[derive(Parser, Debug)]
#[command(
    name = "vnet-tracker",
    version,
    about = "Tracks contract deployments made on CI virtual testnets",
    long_about = "Records the virtual testnets provisioned for a pipeline run, then correlates the \
    deployments found in build-tool logs with them and writes a per-run deployment artifact."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Persist the environments provisioned for this run
    RecordInfra {
        /// JSON array of provisioned environments
        #[arg(long, value_name = "PATH")]
        networks_file: PathBuf,

        #[command(flatten)]
        run: RunCliArgs,

        #[command(flatten)]
        workspace: WorkspaceCliArgs,
    },
    /// Parse deployment logs and write the deployment artifact of this run
    ParseDeployments {
        #[command(flatten)]
        run: RunCliArgs,

        #[command(flatten)]
        workspace: WorkspaceCliArgs,
    },
    /// Pause every environment of this run, optionally recording deployments first
    Cleanup {
        /// Run the deployment parsing step after pausing
        #[arg(long)]
        parse_deployments: bool,

        /// Delete the stored snapshot once done
        #[arg(long)]
        delete_snapshot: bool,

        #[command(flatten)]
        run: RunCliArgs,

        #[command(flatten)]
        workspace: WorkspaceCliArgs,

        #[command(flatten)]
        tenderly: TenderlyCliArgs,
    },
}
