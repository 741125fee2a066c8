use std::fmt;

use serde::{Deserialize, Serialize};

use super::network::{NetworkEnvironment, RunIdentity};

/// Verification outcome reported by the block explorer.
///
/// The set is open: anything the provider answers that is not one of the known values is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VerificationStatus {
    Ok,
    NotOk,
    Pending,
    Other(String),
}

impl From<String> for VerificationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "OK" => Self::Ok,
            "NOTOK" => Self::NotOk,
            "PENDING" => Self::Pending,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for VerificationStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<VerificationStatus> for String {
    fn from(value: VerificationStatus) -> Self {
        value.to_string()
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::NotOk => write!(f, "NOTOK"),
            Self::Pending => write!(f, "PENDING"),
            Self::Other(status) => write!(f, "{status}"),
        }
    }
}

/// A contract deployment (and its verification attempt) recovered from a build-tool log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    pub address: String,
    /// Decimal chain id as printed in the log
    pub chain: String,
    pub verification_status: Option<VerificationStatus>,
    pub compiler: Option<String>,
    pub optimizations: Option<u64>,
    pub contract_path: Option<String>,
    pub contract_name: Option<String>,
}

/// Contracts deployed to one environment, in log order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentGroup {
    pub virtual_test_net: NetworkEnvironment,
    pub contracts: Vec<ContractRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInfo {
    pub run_number: u64,
    pub workflow: String,
    pub job: String,
    pub run_id: u64,
}

impl From<&RunIdentity> for WorkflowInfo {
    fn from(identity: &RunIdentity) -> Self {
        Self {
            run_number: identity.run_number,
            workflow: identity.workflow.clone(),
            job: identity.job.clone(),
            run_id: identity.run_id,
        }
    }
}

/// The deployment artifact of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDeploymentReport {
    pub workflow: WorkflowInfo,
    pub deployments: Vec<DeploymentGroup>,
}

impl ParsedDeploymentReport {
    pub fn new(identity: &RunIdentity, deployments: Vec<DeploymentGroup>) -> Self {
        Self { workflow: identity.into(), deployments }
    }

    pub fn is_empty(&self) -> bool {
        self.deployments.is_empty()
    }

    pub fn contract_count(&self) -> usize {
        self.deployments.iter().map(|group| group.contracts.len()).sum()
    }
}
