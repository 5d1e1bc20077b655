//! Message, response, and settings types shared by all chat clients.

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions for the model.
    System,
    /// Human turn.
    User,
    /// Model turn.
    Assistant,
}

impl MessageRole {
    /// Role name as used by OpenAI-style chat APIs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent the message.
    pub role: MessageRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a message with an explicit role.
    pub fn new<S: Into<String>>(role: MessageRole, content: S) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message.
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message.
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Token accounting reported by a backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: usize,
    /// Tokens generated.
    pub completion_tokens: usize,
    /// Sum of both.
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create usage from prompt and completion counts.
    #[must_use]
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Reply from a chat client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated text.
    pub content: String,

    /// Model that produced the reply, as reported by the backend.
    pub model: String,

    /// Token usage, when the backend reports it.
    pub usage: Option<TokenUsage>,

    /// Why generation stopped, when known.
    pub finish_reason: Option<String>,
}

impl ChatResponse {
    /// Create a response with only text and model.
    pub fn new<S1: Into<String>, S2: Into<String>>(content: S1, model: S2) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            usage: None,
            finish_reason: None,
        }
    }

    /// Attach token usage.
    #[must_use]
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Attach a finish reason.
    pub fn with_finish_reason<S: Into<String>>(mut self, reason: S) -> Self {
        self.finish_reason = Some(reason.into());
        self
    }
}

/// Configuration a chat client was built with.
///
/// Secrets never appear here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Provider tag, e.g. `"groq"`.
    pub provider: String,

    /// Model identifier, or the deployment name for Azure.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Base URL or endpoint the client talks to, if any.
    pub endpoint: Option<String>,

    /// Azure deployment name.
    pub deployment: Option<String>,

    /// Azure API version.
    pub api_version: Option<String>,

    /// Decoding parameters for in-process generation.
    pub generation: Option<GenerationConfig>,

    /// Device an in-process model runs on.
    pub device: Option<String>,
}

impl ClientSettings {
    /// Settings with provider, model, and temperature only.
    pub fn new<S1: Into<String>, S2: Into<String>>(provider: S1, model: S2, temperature: f32) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            temperature,
            endpoint: None,
            deployment: None,
            api_version: None,
            generation: None,
            device: None,
        }
    }

    /// Record the endpoint.
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Record an Azure deployment and API version.
    pub fn with_deployment<S1: Into<String>, S2: Into<String>>(
        mut self,
        deployment: S1,
        api_version: S2,
    ) -> Self {
        self.deployment = Some(deployment.into());
        self.api_version = Some(api_version.into());
        self
    }

    /// Record the decoding parameters.
    #[must_use]
    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Record the device.
    pub fn with_device<S: Into<String>>(mut self, device: S) -> Self {
        self.device = Some(device.into());
        self
    }
}
