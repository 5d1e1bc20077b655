//! Chat client over an in-process Hugging Face model.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ragkit_core::config::{HubCredentials, HuggingFaceChatConfig};
use ragkit_core::{
    ChatMessage, ChatModel, ChatResponse, ClientSettings, RagkitError, Result, TokenUsage,
};
use tracing::{debug, info, instrument};

use super::model::CausalModel;
use super::pipeline::TextGenerationPipeline;
use super::prompt::render_prompt;
use crate::local::{DeviceManager, HubDownloader, LocalError, read_tokenizer};

/// Open-weight causal LM downloaded from the hub and run locally.
///
/// Requests are serialized: generation mutates the model's KV cache. Each
/// request runs on the blocking thread pool.
#[derive(Debug)]
pub struct LocalChatModel {
    pipeline: Arc<Mutex<TextGenerationPipeline>>,
    settings: ClientSettings,
}

impl LocalChatModel {
    /// Download `config.model` with `credentials` and load it.
    pub async fn load(config: &HuggingFaceChatConfig, credentials: &HubCredentials) -> Result<Self> {
        config.validate()?;

        info!(
            "Loading local chat model: {} (revision: {})",
            config.model, config.revision
        );

        let device_manager =
            DeviceManager::with_preference(&config.device).map_err(LocalError::into_llm_error)?;

        let files = HubDownloader::new(Some(credentials))
            .map_err(LocalError::into_llm_error)?
            .download_model(&config.model, &config.revision)
            .await
            .map_err(LocalError::into_llm_error)?;

        let tokenizer = read_tokenizer(&files).map_err(LocalError::into_llm_error)?;
        let model =
            CausalModel::load(&files, device_manager.device()).map_err(LocalError::into_llm_error)?;

        let pipeline = TextGenerationPipeline::new(
            model,
            tokenizer,
            device_manager.device().clone(),
            config.generation.clone(),
        );

        info!(
            "Local chat model ready on {}: {}",
            device_manager.device_info(),
            config.model
        );

        let settings =
            ClientSettings::new("huggingface", &config.model, config.generation.temperature)
                .with_generation(config.generation.clone())
                .with_device(&config.device);
        Ok(Self::from_pipeline(pipeline, settings))
    }

    pub(crate) fn from_pipeline(
        pipeline: TextGenerationPipeline,
        settings: ClientSettings,
    ) -> Self {
        Self {
            pipeline: Arc::new(Mutex::new(pipeline)),
            settings,
        }
    }
}

#[async_trait]
impl ChatModel for LocalChatModel {
    #[instrument(skip(self, messages), fields(model = %self.settings.model))]
    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse> {
        let prompt = render_prompt(messages);
        debug!("Prompt is {} characters", prompt.len());

        let pipeline = Arc::clone(&self.pipeline);
        let generation = tokio::task::spawn_blocking(move || {
            let mut pipeline = pipeline
                .lock()
                .map_err(|_| RagkitError::llm("Generation pipeline lock poisoned"))?;
            pipeline
                .generate(&prompt)
                .map_err(LocalError::into_llm_error)
        })
        .await
        .map_err(|e| RagkitError::llm(format!("Generation task failed: {e}")))??;

        Ok(ChatResponse::new(generation.text, &self.settings.model)
            .with_usage(TokenUsage::new(
                generation.prompt_tokens,
                generation.completion_tokens,
            ))
            .with_finish_reason(generation.finish_reason.as_str()))
    }

    fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn name(&self) -> &'static str {
        "LocalChatModel"
    }
}
