//! Azure OpenAI chat completions.

use async_trait::async_trait;
use ragkit_core::config::AzureDeployment;
use ragkit_core::{
    ChatMessage, ChatModel, ChatResponse, ClientSettings, RagkitError, Result, TokenUsage,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::azure::AzureHttp;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

/// Chat client for an Azure OpenAI chat deployment.
#[derive(Debug, Clone)]
pub struct AzureChatClient {
    http: AzureHttp,
    settings: ClientSettings,
}

impl AzureChatClient {
    /// Bind a client to `deployment`. No request is made.
    pub fn new(deployment: AzureDeployment, temperature: f32) -> Result<Self> {
        let settings = ClientSettings::new("azure_openai", &deployment.deployment, temperature)
            .with_endpoint(&deployment.endpoint)
            .with_deployment(&deployment.deployment, &deployment.api_version);

        info!(
            "Creating Azure OpenAI chat client: deployment={}, api_version={}, temperature={}",
            deployment.deployment, deployment.api_version, temperature
        );

        Ok(Self {
            http: AzureHttp::new(deployment)?,
            settings,
        })
    }

    /// The deployment this client is bound to.
    pub fn deployment(&self) -> &AzureDeployment {
        self.http.deployment()
    }
}

#[async_trait]
impl ChatModel for AzureChatClient {
    #[instrument(skip(self, messages), fields(client = "AzureChatClient"))]
    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse> {
        debug!("Sending {} messages", messages.len());

        let request = CompletionRequest {
            messages,
            temperature: self.settings.temperature,
        };
        let response: CompletionResponse = self
            .http
            .post(&self.deployment().chat_completions_url(), &request)
            .await
            .map_err(|e| RagkitError::llm(e.to_string()))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| RagkitError::llm("Azure OpenAI returned no choices"))?;
        let content = choice
            .message
            .content
            .ok_or_else(|| RagkitError::llm("Azure OpenAI returned a choice without text"))?;

        let model = response
            .model
            .unwrap_or_else(|| self.settings.model.clone());
        let mut result = ChatResponse::new(content, model);
        if let Some(usage) = response.usage {
            result = result.with_usage(TokenUsage::new(
                usage.prompt_tokens,
                usage.completion_tokens,
            ));
        }
        if let Some(reason) = choice.finish_reason {
            result = result.with_finish_reason(reason);
        }
        Ok(result)
    }

    fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn name(&self) -> &'static str {
        "AzureChatClient"
    }
}
