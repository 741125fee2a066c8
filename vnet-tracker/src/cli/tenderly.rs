use clap::Args;
use url::Url;

/// Parameters of the Tenderly API client.
#[derive(Debug, Clone, Args)]
pub struct TenderlyCliArgs {
    /// Tenderly access key
    #[arg(env = "TENDERLY_ACCESS_KEY", long, hide_env_values = true)]
    pub tenderly_access_key: Option<String>,

    /// Tenderly account slug
    #[arg(env = "TENDERLY_ACCOUNT_NAME", long)]
    pub tenderly_account: Option<String>,

    /// Tenderly project slug
    #[arg(env = "TENDERLY_PROJECT_NAME", long)]
    pub tenderly_project: Option<String>,

    /// Base URL of the Tenderly API
    #[arg(env = "TENDERLY_API_URL", long, default_value = "https://api.tenderly.co/api/v1")]
    pub tenderly_api_url: Url,
}
