use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ProvisionerError {
    /// Transport failures (timeouts, refused connections, truncated responses)
    #[error("Network error during {operation}: {message}")]
    NetworkError { operation: String, message: String },

    /// The provisioning API answered with a non-success status
    #[error("Provisioning API error during {operation} (status {status}): {message}")]
    ApiError { operation: String, status: StatusCode, message: String },

    #[error("Failed to build URL for {operation}: {message}")]
    UrlError { operation: String, message: String },
}

impl ProvisionerError {
    pub fn from_reqwest_error(operation: impl Into<String>, source: reqwest::Error) -> Self {
        let operation = operation.into();
        match source.status() {
            Some(status) => ProvisionerError::ApiError { operation, status, message: source.to_string() },
            None if source.is_timeout() => {
                ProvisionerError::NetworkError { operation, message: "request timed out".to_string() }
            }
            None => ProvisionerError::NetworkError { operation, message: source.to_string() },
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ProvisionerError::NetworkError { .. })
    }
}
