//! HTTP plumbing shared by the Azure OpenAI chat and embedding clients.

use std::time::Duration;

use ragkit_core::config::AzureDeployment;
use ragkit_core::{RagkitError, Result};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error};

/// Request timeout for Azure OpenAI calls.
pub const AZURE_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Failure of a single Azure OpenAI request.
#[derive(Debug, Error)]
pub enum AzureRequestError {
    /// The request could not be sent or the response body not read.
    #[error("request to Azure OpenAI failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Azure answered with a non-success status.
    #[error("Azure OpenAI returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message from the response body, or the raw body
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected Azure OpenAI response: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(Debug, serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: String,
}

/// An HTTP client bound to one Azure OpenAI deployment.
#[derive(Debug, Clone)]
pub struct AzureHttp {
    client: Client,
    deployment: AzureDeployment,
}

impl AzureHttp {
    /// Build a client for `deployment`. No request is made.
    pub fn new(deployment: AzureDeployment) -> Result<Self> {
        let client = Client::builder()
            .timeout(AZURE_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RagkitError::configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, deployment })
    }

    /// The deployment this client is bound to.
    pub fn deployment(&self) -> &AzureDeployment {
        &self.deployment
    }

    /// POST `body` as JSON to `url` and decode the JSON response.
    pub async fn post<Req, Resp>(
        &self,
        url: &str,
        body: &Req,
    ) -> std::result::Result<Resp, AzureRequestError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .header("api-key", &self.deployment.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(AzureRequestError::Transport)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(AzureRequestError::Transport)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            error!("Azure OpenAI error {}: {}", status, message);
            return Err(AzureRequestError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(AzureRequestError::Decode)
    }
}
