//! Groq and Ollama chat clients built on `siumai`.

use async_trait::async_trait;
use ragkit_core::config::{GroqChatConfig, OllamaChatConfig};
use ragkit_core::{
    ChatMessage, ChatModel, ChatResponse, ClientSettings, MessageRole, RagkitError, Result,
    TokenUsage,
};
use siumai::prelude::{ChatCapability, ChatMessage as SiumaiMessage, Siumai};
use tracing::{debug, info, instrument};

/// Public Groq OpenAI-compatible endpoint.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Chat client for a provider reached through `siumai`.
pub struct SiumaiChatClient {
    client: Siumai,
    settings: ClientSettings,
}

impl std::fmt::Debug for SiumaiChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiumaiChatClient")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SiumaiChatClient {
    /// Build a Groq client. No request is made.
    pub async fn groq(config: &GroqChatConfig, api_key: String) -> Result<Self> {
        config.validate()?;

        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(GROQ_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let client = Siumai::builder()
            .groq()
            .api_key(api_key)
            .base_url(&base_url)
            .model(&config.model)
            .temperature(config.temperature)
            .build()
            .await
            .map_err(|e| RagkitError::configuration(format!("Failed to create Groq client: {e}")))?;

        info!(
            "Created Groq chat client: model={}, temperature={}",
            config.model, config.temperature
        );

        Ok(Self {
            client,
            settings: ClientSettings::new("groq", &config.model, config.temperature)
                .with_endpoint(base_url),
        })
    }

    /// Build an Ollama client for the daemon at `base_url`. No request is made.
    pub async fn ollama(config: &OllamaChatConfig, base_url: String) -> Result<Self> {
        config.validate()?;

        let client = Siumai::builder()
            .ollama()
            .base_url(&base_url)
            .model(&config.model)
            .temperature(config.temperature)
            .build()
            .await
            .map_err(|e| {
                RagkitError::configuration(format!("Failed to create Ollama client: {e}"))
            })?;

        info!(
            "Created Ollama chat client: model={}, base_url={}",
            config.model, base_url
        );

        Ok(Self {
            client,
            settings: ClientSettings::new("ollama", &config.model, config.temperature)
                .with_endpoint(base_url),
        })
    }
}

fn to_siumai_message(message: &ChatMessage) -> SiumaiMessage {
    let content = message.content.as_str();
    match message.role {
        MessageRole::System => SiumaiMessage::system(content).build(),
        MessageRole::User => SiumaiMessage::user(content).build(),
        MessageRole::Assistant => SiumaiMessage::assistant(content).build(),
    }
}

#[async_trait]
impl ChatModel for SiumaiChatClient {
    #[instrument(skip(self, messages), fields(provider = %self.settings.provider))]
    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse> {
        debug!("Sending {} messages", messages.len());

        let request = messages.iter().map(to_siumai_message).collect();
        let response = self.client.chat(request).await.map_err(|e| {
            RagkitError::llm(format!("{} chat failed: {e}", self.settings.provider))
        })?;

        let content = response
            .content_text()
            .map(str::to_owned)
            .ok_or_else(|| RagkitError::llm("Unsupported content type in LLM response"))?;

        let model = response
            .model
            .clone()
            .unwrap_or_else(|| self.settings.model.clone());
        let mut result = ChatResponse::new(content, model);
        if let Some(usage) = &response.usage {
            result = result.with_usage(TokenUsage::new(
                usage.prompt_tokens as usize,
                usage.completion_tokens as usize,
            ));
        }
        if let Some(reason) = &response.finish_reason {
            result = result.with_finish_reason(format!("{reason:?}"));
        }
        Ok(result)
    }

    fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn name(&self) -> &'static str {
        "SiumaiChatClient"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_roles_are_preserved() {
        let converted = to_siumai_message(&ChatMessage::system("be brief"));
        assert_eq!(converted.content_text(), Some("be brief"));
        assert!(matches!(
            converted.role,
            siumai::prelude::MessageRole::System
        ));
    }

    #[tokio::test]
    async fn test_ollama_settings_are_recorded() {
        let config = OllamaChatConfig::new("mistral").with_temperature(0.9);
        let client = SiumaiChatClient::ollama(&config, "http://gpu-box:11434".to_string())
            .await
            .unwrap();

        let settings = client.settings();
        assert_eq!(settings.provider, "ollama");
        assert_eq!(settings.model, "mistral");
        assert_eq!(settings.endpoint.as_deref(), Some("http://gpu-box:11434"));
        approx::assert_relative_eq!(settings.temperature, 0.9);
    }

    #[tokio::test]
    async fn test_groq_defaults_to_public_endpoint() {
        let client = SiumaiChatClient::groq(&GroqChatConfig::default(), "gsk_test".to_string())
            .await
            .unwrap();
        assert_eq!(client.settings().endpoint.as_deref(), Some(GROQ_BASE_URL));
        assert_eq!(client.settings().model, "llama-3.3-70b-versatile");
    }
}
