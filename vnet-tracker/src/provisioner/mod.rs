pub mod error;
pub mod tenderly;

use async_trait::async_trait;
pub use error::ProvisionerError;
pub use tenderly::TenderlyClient;

use crate::types::NetworkEnvironment;

/// Remote API that owns the lifecycle of provisioned environments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VnetClient: Send + Sync {
    /// Stops an environment from serving requests without deleting its state.
    async fn pause(&self, environment: &NetworkEnvironment) -> Result<(), ProvisionerError>;
}
