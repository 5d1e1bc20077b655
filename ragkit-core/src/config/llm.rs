//! Configuration records for chat backends.
//!
//! A [`ChatBackend`] names one provider and carries the caller-supplied
//! settings for it. Environment-derived values (endpoints, keys, tokens) are
//! not part of these records; they are resolved when a client is built.

use serde::{Deserialize, Serialize};

use crate::{RagkitError, Result};

/// Default sampling temperature for Azure OpenAI chat.
pub const DEFAULT_AZURE_TEMPERATURE: f32 = 0.4;

/// Default sampling temperature for every other chat backend.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Default model run in-process from the Hugging Face Hub.
pub const DEFAULT_HUGGINGFACE_CHAT_MODEL: &str = "google/gemma-2b-it";

/// Default Groq model.
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// A chat provider selection together with its configuration.
///
/// # Examples
///
/// ```rust
/// use ragkit_core::config::ChatBackend;
///
/// let backend: ChatBackend =
///     serde_json::from_str(r#"{"provider": "groq", "model": "mixtral-8x7b-32768"}"#).unwrap();
/// assert_eq!(backend.model(), Some("mixtral-8x7b-32768"));
/// assert_eq!(backend.temperature(), 0.5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum ChatBackend {
    /// Azure OpenAI chat deployment.
    #[serde(rename = "azure_openai")]
    AzureOpenAi(AzureChatConfig),

    /// Open-weight model downloaded from the Hugging Face Hub and run locally.
    #[serde(rename = "huggingface")]
    HuggingFace(HuggingFaceChatConfig),

    /// Groq hosted inference.
    Groq(GroqChatConfig),

    /// Local Ollama daemon.
    Ollama(OllamaChatConfig),
}

impl ChatBackend {
    /// Azure OpenAI with default settings.
    #[must_use]
    pub fn azure_openai() -> Self {
        Self::AzureOpenAi(AzureChatConfig::default())
    }

    /// Hugging Face local inference with default settings.
    #[must_use]
    pub fn huggingface() -> Self {
        Self::HuggingFace(HuggingFaceChatConfig::default())
    }

    /// Groq with default settings.
    #[must_use]
    pub fn groq() -> Self {
        Self::Groq(GroqChatConfig::default())
    }

    /// Ollama with default settings.
    #[must_use]
    pub fn ollama() -> Self {
        Self::Ollama(OllamaChatConfig::default())
    }

    /// Tag naming the provider, as used in serialized records.
    #[must_use]
    pub fn provider(&self) -> &'static str {
        match self {
            Self::AzureOpenAi(_) => "azure_openai",
            Self::HuggingFace(_) => "huggingface",
            Self::Groq(_) => "groq",
            Self::Ollama(_) => "ollama",
        }
    }

    /// Model identifier, if the backend takes one.
    ///
    /// Azure chat is addressed by deployment, which comes from the
    /// environment, so it has none here.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        match self {
            Self::AzureOpenAi(_) => None,
            Self::HuggingFace(config) => Some(&config.model),
            Self::Groq(config) => Some(&config.model),
            Self::Ollama(config) => Some(&config.model),
        }
    }

    /// Sampling temperature.
    #[must_use]
    pub fn temperature(&self) -> f32 {
        match self {
            Self::AzureOpenAi(config) => config.temperature,
            Self::HuggingFace(config) => config.generation.temperature,
            Self::Groq(config) => config.temperature,
            Self::Ollama(config) => config.temperature,
        }
    }

    /// Validate the wrapped configuration.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::AzureOpenAi(config) => validate_temperature(config.temperature),
            Self::HuggingFace(config) => config.validate(),
            Self::Groq(config) => config.validate(),
            Self::Ollama(config) => config.validate(),
        }
    }
}

impl Default for ChatBackend {
    fn default() -> Self {
        Self::azure_openai()
    }
}

/// Settings for Azure OpenAI chat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AzureChatConfig {
    /// Sampling temperature (0.0 to 2.0).
    pub temperature: f32,
}

impl AzureChatConfig {
    /// Set the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

impl Default for AzureChatConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_AZURE_TEMPERATURE,
        }
    }
}

/// Decoding parameters for in-process generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Maximum number of tokens generated after the prompt.
    pub max_new_tokens: usize,

    /// Sampling temperature.
    pub temperature: f32,

    /// Nucleus sampling threshold.
    pub top_p: f64,

    /// Penalty applied to logits of recently generated tokens. 1.0 disables it.
    pub repetition_penalty: f32,

    /// Number of trailing tokens the repetition penalty looks at.
    pub repeat_last_n: usize,

    /// Sample from the distribution; greedy decoding when false.
    pub do_sample: bool,

    /// Seed for the sampling RNG.
    pub seed: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_new_tokens: 512,
            temperature: DEFAULT_TEMPERATURE,
            top_p: 0.95,
            repetition_penalty: 1.1,
            repeat_last_n: 64,
            do_sample: true,
            seed: 299_792_458,
        }
    }
}

impl GenerationConfig {
    /// Set the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum number of new tokens.
    #[must_use]
    pub fn with_max_new_tokens(mut self, max_new_tokens: usize) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable sampling.
    #[must_use]
    pub fn with_sampling(mut self, do_sample: bool) -> Self {
        self.do_sample = do_sample;
        self
    }

    /// Validate the decoding parameters.
    pub fn validate(&self) -> Result<()> {
        validate_temperature(self.temperature)?;

        if self.max_new_tokens == 0 {
            return Err(RagkitError::configuration(
                "max_new_tokens must be greater than 0",
            ));
        }

        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(RagkitError::configuration(
                "top_p must be in the range (0, 1]",
            ));
        }

        if self.repetition_penalty <= 0.0 {
            return Err(RagkitError::configuration(
                "repetition_penalty must be greater than 0",
            ));
        }

        Ok(())
    }
}

/// Settings for a Hugging Face model run in-process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HuggingFaceChatConfig {
    /// Hub model identifier.
    pub model: String,

    /// Hub revision (branch, tag, or commit).
    pub revision: String,

    /// Device to run on ("cpu", "cuda", "metal", "auto").
    pub device: String,

    /// Decoding parameters.
    pub generation: GenerationConfig,
}

impl Default for HuggingFaceChatConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_HUGGINGFACE_CHAT_MODEL.to_string(),
            revision: "main".to_string(),
            device: "cpu".to_string(),
            generation: GenerationConfig::default(),
        }
    }
}

impl HuggingFaceChatConfig {
    /// Create a configuration for the given model with default decoding.
    pub fn new<S: Into<String>>(model: S) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.generation.temperature = temperature;
        self
    }

    /// Set the hub revision.
    pub fn with_revision<S: Into<String>>(mut self, revision: S) -> Self {
        self.revision = revision.into();
        self
    }

    /// Set the device.
    pub fn with_device<S: Into<String>>(mut self, device: S) -> Self {
        self.device = device.into();
        self
    }

    /// Replace the decoding parameters.
    #[must_use]
    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validate_model(&self.model)?;
        if self.revision.is_empty() {
            return Err(RagkitError::configuration("Revision cannot be empty"));
        }
        if self.device.is_empty() {
            return Err(RagkitError::configuration("Device cannot be empty"));
        }
        self.generation.validate()
    }
}

/// Settings for Groq.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GroqChatConfig {
    /// Model identifier.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// OpenAI-compatible base URL, for proxies. Defaults to the public Groq API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for GroqChatConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_GROQ_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: None,
        }
    }
}

impl GroqChatConfig {
    /// Create a configuration for the given model.
    pub fn new<S: Into<String>>(model: S) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the base URL.
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validate_model(&self.model)?;
        validate_temperature(self.temperature)?;
        validate_base_url(self.base_url.as_deref())
    }
}

/// Settings for a local Ollama daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OllamaChatConfig {
    /// Model name as known to the daemon.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Daemon URL. Falls back to `OLLAMA_BASE_URL`, then `http://localhost:11434`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for OllamaChatConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: None,
        }
    }
}

impl OllamaChatConfig {
    /// Create a configuration for the given model.
    pub fn new<S: Into<String>>(model: S) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the daemon URL.
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validate_model(&self.model)?;
        validate_temperature(self.temperature)?;
        validate_base_url(self.base_url.as_deref())
    }
}

fn validate_model(model: &str) -> Result<()> {
    if model.trim().is_empty() {
        return Err(RagkitError::configuration("Model cannot be empty"));
    }
    Ok(())
}

fn validate_base_url(url: Option<&str>) -> Result<()> {
    if let Some(url) = url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(RagkitError::configuration(
                "Base URL must start with http:// or https://",
            ));
        }
    }
    Ok(())
}

fn validate_temperature(temperature: f32) -> Result<()> {
    if !(0.0..=2.0).contains(&temperature) {
        return Err(RagkitError::configuration(
            "Temperature must be between 0.0 and 2.0",
        ));
    }
    Ok(())
}
