pub mod deployment;
pub mod network;

pub use deployment::{ContractRecord, DeploymentGroup, ParsedDeploymentReport, VerificationStatus, WorkflowInfo};
pub use network::{InfrastructureSnapshot, NetworkEnvironment, RunIdentity};
