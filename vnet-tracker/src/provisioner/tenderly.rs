use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::{ProvisionerError, VnetClient};
use crate::config::TenderlyParams;
use crate::types::NetworkEnvironment;

const ACCESS_KEY_HEADER: &str = "X-Access-Key";

#[derive(Debug, Serialize)]
struct StatusUpdate<'a> {
    status: &'a str,
}

/// Client of the Tenderly virtual testnet API.
pub struct TenderlyClient {
    client: reqwest::Client,
    params: TenderlyParams,
}

impl TenderlyClient {
    pub fn new(params: TenderlyParams) -> Self {
        Self { client: reqwest::Client::new(), params }
    }

    fn vnet_url(&self, vnet_id: &str) -> Result<Url, ProvisionerError> {
        let mut url = self.params.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProvisionerError::UrlError {
                operation: "pause".to_string(),
                message: format!("{} cannot be a base URL", self.params.api_url),
            })?
            .pop_if_empty()
            .extend([
                "account",
                self.params.account.as_str(),
                "project",
                self.params.project.as_str(),
                "vnets",
                vnet_id,
            ]);
        Ok(url)
    }
}

#[async_trait]
impl VnetClient for TenderlyClient {
    async fn pause(&self, environment: &NetworkEnvironment) -> Result<(), ProvisionerError> {
        let url = self.vnet_url(&environment.id)?;
        debug!(vnet_id = %environment.id, slug = %environment.testnet_slug, "Pausing virtual testnet");

        let response = self
            .client
            .patch(url)
            .header(ACCESS_KEY_HEADER, &self.params.access_key)
            .json(&StatusUpdate { status: "paused" })
            .send()
            .await
            .map_err(|e| ProvisionerError::from_reqwest_error("pause", e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(ProvisionerError::ApiError { operation: "pause".to_string(), status, message })
    }
}
