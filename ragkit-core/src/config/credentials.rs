//! Settings resolved from the environment at factory call time.
//!
//! These values are never cached: every factory call resolves them again
//! from its [`EnvSource`].

use super::env::{EnvSource, vars};
use crate::{RagkitError, Result};

/// Default URL of a locally running Ollama daemon.
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// An Azure OpenAI deployment and the credentials needed to call it.
#[derive(Clone, PartialEq, Eq)]
pub struct AzureDeployment {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,

    /// Deployment name.
    pub deployment: String,

    /// REST API version, e.g. `2024-02-01`.
    pub api_version: String,

    /// API key sent in the `api-key` header.
    pub api_key: String,
}

impl AzureDeployment {
    /// Resolve the chat deployment.
    ///
    /// Reads `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_CHAT_DEPLOYMENT_NAME`,
    /// `AZURE_OPENAI_CHAT_API_VERSION` and `AZURE_OPENAI_API_KEY`, in that order.
    pub fn chat_from_env(env: &dyn EnvSource) -> Result<Self> {
        Self::from_env(
            env,
            vars::AZURE_OPENAI_CHAT_DEPLOYMENT_NAME,
            vars::AZURE_OPENAI_CHAT_API_VERSION,
        )
    }

    /// Resolve the embedding deployment.
    ///
    /// Reads `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_EMBEDDING_DEPLOYMENT_NAME`,
    /// `AZURE_OPENAI_EMBEDDING_API_VERSION` and `AZURE_OPENAI_API_KEY`, in that order.
    pub fn embedding_from_env(env: &dyn EnvSource) -> Result<Self> {
        Self::from_env(
            env,
            vars::AZURE_OPENAI_EMBEDDING_DEPLOYMENT_NAME,
            vars::AZURE_OPENAI_EMBEDDING_API_VERSION,
        )
    }

    fn from_env(env: &dyn EnvSource, deployment_var: &str, version_var: &str) -> Result<Self> {
        let endpoint = env.require(vars::AZURE_OPENAI_ENDPOINT)?;
        let deployment = env.require(deployment_var)?;
        let api_version = env.require(version_var)?;
        let api_key = env.require(vars::AZURE_OPENAI_API_KEY)?;

        let deployment = Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            deployment,
            api_version,
            api_key,
        };
        deployment.validate()?;
        Ok(deployment)
    }

    /// Validate the deployment settings.
    pub fn validate(&self) -> Result<()> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(RagkitError::configuration(format!(
                "Azure endpoint must start with http:// or https://, got: {}",
                self.endpoint
            )));
        }
        if self.deployment.is_empty() {
            return Err(RagkitError::configuration("Deployment cannot be empty"));
        }
        if self.api_version.is_empty() {
            return Err(RagkitError::configuration("API version cannot be empty"));
        }
        Ok(())
    }

    /// Base URL of the deployment, without the operation path.
    #[must_use]
    pub fn deployment_url(&self) -> String {
        format!("{}/openai/deployments/{}", self.endpoint, self.deployment)
    }

    /// Full URL of the chat completions operation.
    #[must_use]
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/chat/completions?api-version={}",
            self.deployment_url(),
            self.api_version
        )
    }

    /// Full URL of the embeddings operation.
    #[must_use]
    pub fn embeddings_url(&self) -> String {
        format!(
            "{}/embeddings?api-version={}",
            self.deployment_url(),
            self.api_version
        )
    }
}

impl std::fmt::Debug for AzureDeployment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDeployment")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Hugging Face Hub credentials, scoped to the download that uses them.
///
/// Holding the token in a value passed to the downloader replaces a
/// process-wide login: nothing global is mutated, and concurrent or repeated
/// constructions cannot interfere with each other.
#[derive(Clone, PartialEq, Eq)]
pub struct HubCredentials {
    token: String,
}

impl HubCredentials {
    /// Wrap an explicit token.
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Read `HUGGINGFACE_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`RagkitError::Authentication`] when the token is absent or
    /// empty, since no download is possible for gated models without it.
    pub fn from_env(env: &dyn EnvSource) -> Result<Self> {
        env.get_non_empty(vars::HUGGINGFACE_TOKEN)
            .map(Self::new)
            .ok_or_else(|| {
                RagkitError::authentication(format!(
                    "{} is not set; a Hugging Face access token is required",
                    vars::HUGGINGFACE_TOKEN
                ))
            })
    }

    /// Read `HUGGINGFACE_TOKEN` if it is set.
    pub fn optional_from_env(env: &dyn EnvSource) -> Option<Self> {
        env.get_non_empty(vars::HUGGINGFACE_TOKEN).map(Self::new)
    }

    /// The raw token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for HubCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubCredentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Read `GROQ_API_KEY`.
pub fn groq_api_key(env: &dyn EnvSource) -> Result<String> {
    env.require(vars::GROQ_API_KEY)
}

/// Resolve the Ollama daemon URL, honoring `OLLAMA_BASE_URL` when set.
#[must_use]
pub fn ollama_base_url(env: &dyn EnvSource) -> String {
    env.get_non_empty(vars::OLLAMA_BASE_URL)
        .map_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string(), |url| {
            url.trim_end_matches('/').to_string()
        })
}
