use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// One provisioned virtual testnet (a fork of some source network).
///
/// Created once when the environment is provisioned and never mutated afterwards.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkEnvironment {
    /// Opaque identifier assigned by the provisioning API
    pub id: String,
    /// Administrative RPC endpoint. Grants state-override access, keep it out of logs.
    pub admin_rpc_url: String,
    pub public_rpc_url: String,
    /// Identifier of the network this environment was forked from
    pub network_id: String,
    pub chain_id: u64,
    /// Human readable slug, unique within a run
    pub testnet_slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
}

impl fmt::Debug for NetworkEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkEnvironment")
            .field("id", &self.id)
            .field("admin_rpc_url", &"<redacted>")
            .field("public_rpc_url", &self.public_rpc_url)
            .field("network_id", &self.network_id)
            .field("chain_id", &self.chain_id)
            .field("testnet_slug", &self.testnet_slug)
            .field("explorer_url", &self.explorer_url)
            .finish()
    }
}

/// Identity of a CI pipeline run.
///
/// On disk every field is a string, the way the CI environment hands them over.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunIdentity {
    pub workflow: String,
    #[serde_as(as = "DisplayFromStr")]
    pub run_id: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub run_number: u64,
    pub job: String,
}

/// All environments provisioned by one pipeline run.
///
/// Written once by the provisioning step, read by every later step of the same run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureSnapshot {
    /// Environments keyed by network id, in the order they were provisioned (and stored).
    pub networks: IndexMap<String, NetworkEnvironment>,
    pub timestamp: DateTime<Utc>,
    pub github_context: RunIdentity,
}

impl InfrastructureSnapshot {
    pub fn new(github_context: RunIdentity, networks: impl IntoIterator<Item = NetworkEnvironment>) -> Self {
        let networks = networks.into_iter().map(|network| (network.network_id.clone(), network)).collect();
        Self { networks, timestamp: Utc::now(), github_context }
    }

    pub fn environments(&self) -> impl Iterator<Item = &NetworkEnvironment> {
        self.networks.values()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}
