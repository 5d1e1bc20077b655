//! The chat-client factory.

use std::sync::Arc;

use async_trait::async_trait;
use ragkit_core::config::{
    AzureChatConfig, AzureDeployment, ChatBackend, DEFAULT_HUGGINGFACE_CHAT_MODEL, EnvSource,
    GroqChatConfig, HubCredentials, HuggingFaceChatConfig, OllamaChatConfig, ProcessEnv,
    groq_api_key, ollama_base_url,
};
use ragkit_core::factory::LlmFactory;
use ragkit_core::{ChatModel, Result};
use tracing::{info, instrument};

use crate::llm::{AzureChatClient, SiumaiChatClient};

/// Builds chat clients for every supported backend.
///
/// Endpoints, keys, and tokens are read from the factory's [`EnvSource`] on
/// every call; nothing is cached and every call returns a new client.
///
/// # Examples
///
/// ```rust,no_run
/// use ragkit_integrations::LlmCall;
///
/// # async fn example() -> ragkit_core::Result<()> {
/// let llm = LlmCall::new().chat_groq(Some("mixtral-8x7b-32768"), Some(0.2)).await?;
/// let answer = llm.complete("What is RAG?").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LlmCall {
    env: Arc<dyn EnvSource>,
}

impl Default for LlmCall {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmCall {
    /// Factory over the process environment, after loading `.env` if present.
    pub fn new() -> Self {
        Self::with_env(Arc::new(ProcessEnv::with_dotenv()))
    }

    /// Factory over an explicit environment source.
    pub fn with_env(env: Arc<dyn EnvSource>) -> Self {
        Self { env }
    }

    /// Azure OpenAI chat deployment; temperature defaults to 0.4.
    pub async fn azure_openai(&self, temperature: Option<f32>) -> Result<Arc<dyn ChatModel>> {
        let mut config = AzureChatConfig::default();
        if let Some(temperature) = temperature {
            config = config.with_temperature(temperature);
        }
        self.create(&ChatBackend::AzureOpenAi(config)).await
    }

    /// Hugging Face model run in-process; defaults to `google/gemma-2b-it`
    /// at temperature 0.5.
    pub async fn huggingface(
        &self,
        model: Option<&str>,
        temperature: Option<f32>,
    ) -> Result<Arc<dyn ChatModel>> {
        let mut config =
            HuggingFaceChatConfig::new(model.unwrap_or(DEFAULT_HUGGINGFACE_CHAT_MODEL));
        if let Some(temperature) = temperature {
            config = config.with_temperature(temperature);
        }
        self.create(&ChatBackend::HuggingFace(config)).await
    }

    /// Groq; defaults to `llama-3.3-70b-versatile` at temperature 0.5.
    pub async fn chat_groq(
        &self,
        model: Option<&str>,
        temperature: Option<f32>,
    ) -> Result<Arc<dyn ChatModel>> {
        let mut config = model.map(GroqChatConfig::new).unwrap_or_default();
        if let Some(temperature) = temperature {
            config = config.with_temperature(temperature);
        }
        self.create(&ChatBackend::Groq(config)).await
    }

    /// Local Ollama daemon; defaults to `llama3.2` at temperature 0.5.
    pub async fn chat_ollama(
        &self,
        model: Option<&str>,
        temperature: Option<f32>,
    ) -> Result<Arc<dyn ChatModel>> {
        let mut config = model.map(OllamaChatConfig::new).unwrap_or_default();
        if let Some(temperature) = temperature {
            config = config.with_temperature(temperature);
        }
        self.create(&ChatBackend::Ollama(config)).await
    }

    /// Build a client for any backend.
    ///
    /// The record is validated and environment values are resolved before
    /// any network call.
    #[instrument(skip(self), fields(provider = backend.provider()))]
    pub async fn create(&self, backend: &ChatBackend) -> Result<Arc<dyn ChatModel>> {
        backend.validate()?;

        let client: Arc<dyn ChatModel> = match backend {
            ChatBackend::AzureOpenAi(config) => {
                let deployment = AzureDeployment::chat_from_env(self.env.as_ref())?;
                Arc::new(AzureChatClient::new(deployment, config.temperature)?)
            }
            ChatBackend::HuggingFace(config) => {
                let credentials = HubCredentials::from_env(self.env.as_ref())?;
                self.create_local(config, &credentials).await?
            }
            ChatBackend::Groq(config) => {
                let api_key = groq_api_key(self.env.as_ref())?;
                Arc::new(SiumaiChatClient::groq(config, api_key).await?)
            }
            ChatBackend::Ollama(config) => {
                let base_url = config.base_url.as_ref().map_or_else(
                    || ollama_base_url(self.env.as_ref()),
                    |url| url.trim_end_matches('/').to_string(),
                );
                Arc::new(SiumaiChatClient::ollama(config, base_url).await?)
            }
        };

        info!(
            "Created {} chat client for model {}",
            backend.provider(),
            client.settings().model
        );
        Ok(client)
    }

    #[cfg(feature = "local")]
    async fn create_local(
        &self,
        config: &HuggingFaceChatConfig,
        credentials: &HubCredentials,
    ) -> Result<Arc<dyn ChatModel>> {
        let model = crate::llm::LocalChatModel::load(config, credentials).await?;
        Ok(Arc::new(model))
    }

    #[cfg(not(feature = "local"))]
    async fn create_local(
        &self,
        _config: &HuggingFaceChatConfig,
        _credentials: &HubCredentials,
    ) -> Result<Arc<dyn ChatModel>> {
        Err(ragkit_core::RagkitError::configuration(
            "The huggingface backend requires the `local` feature",
        ))
    }
}

#[async_trait]
impl LlmFactory for LlmCall {
    async fn create_llm(&self, backend: &ChatBackend) -> Result<Arc<dyn ChatModel>> {
        self.create(backend).await
    }

    fn supported_providers(&self) -> Vec<&'static str> {
        let mut providers = vec!["azure_openai", "groq", "ollama"];
        if cfg!(feature = "local") {
            providers.push("huggingface");
        }
        providers
    }

    fn name(&self) -> &'static str {
        "LlmCall"
    }

    fn metadata(&self) -> std::collections::HashMap<String, serde_json::Value> {
        let mut metadata = std::collections::HashMap::new();
        metadata.insert("name".to_string(), self.name().into());
        metadata.insert(
            "description".to_string(),
            "Factory for chat clients over Azure OpenAI, Hugging Face, Groq and Ollama".into(),
        );
        metadata.insert(
            "supported_providers".to_string(),
            self.supported_providers().into(),
        );
        metadata.insert("version".to_string(), env!("CARGO_PKG_VERSION").into());
        metadata
    }
}
