//! Candle embedder implementation.

use std::path::Path;

use async_trait::async_trait;
use candle_core::Tensor;
use ragkit_core::config::HubCredentials;
use ragkit_core::{Embedder, Result};
use serde::Deserialize;
use tracing::{debug, info};

use super::{
    config::CandleEmbedderConfig, model::SentenceModel, tokenizer::EmbeddingTokenizer,
};
use crate::local::{DeviceManager, HubDownloader, LocalError, read_tokenizer};

/// Sentence-transformers settings shipped next to the weights.
const SENTENCE_TRANSFORMERS_CONFIG: &str = "sentence_bert_config.json";

#[derive(Debug, Deserialize)]
struct SentenceTransformersConfig {
    max_seq_length: Option<usize>,
}

/// Sentence-transformers model run in-process with Candle.
///
/// The model is downloaded and loaded when the embedder is created; embedding
/// calls never touch the network.
///
/// # Examples
///
/// ```rust,no_run
/// use ragkit_core::Embedder;
/// use ragkit_integrations::embedders::candle::{CandleEmbedder, CandleEmbedderConfig};
///
/// # async fn example() -> ragkit_core::Result<()> {
/// let embedder = CandleEmbedder::load(CandleEmbedderConfig::default(), None).await?;
///
/// let embeddings = embedder.embed_batch(vec!["Hello", "World"]).await?;
/// assert_eq!(embeddings.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CandleEmbedder {
    config: CandleEmbedderConfig,
    device_manager: DeviceManager,
    tokenizer: EmbeddingTokenizer,
    model: SentenceModel,
}

impl CandleEmbedder {
    /// Download and load the configured model.
    ///
    /// `credentials` are only needed for gated or private models.
    pub async fn load(
        config: CandleEmbedderConfig,
        credentials: Option<HubCredentials>,
    ) -> Result<Self> {
        info!("Creating Candle embedder: {}", config.model_name);

        let device_manager = DeviceManager::with_preference(&config.device)
            .map_err(LocalError::into_embedding_error)?;

        let downloader =
            HubDownloader::new(credentials.as_ref()).map_err(LocalError::into_embedding_error)?;
        let files = downloader
            .download_model(&config.model_name, &config.revision)
            .await
            .map_err(LocalError::into_embedding_error)?;
        let sentence_config = downloader
            .download_optional(
                &config.model_name,
                &config.revision,
                SENTENCE_TRANSFORMERS_CONFIG,
            )
            .await
            .map_err(LocalError::into_embedding_error)?;

        let max_length = effective_max_length(config.max_length, sentence_config.as_deref())
            .map_err(LocalError::into_embedding_error)?;
        let tokenizer = read_tokenizer(&files)
            .and_then(|t| EmbeddingTokenizer::from_tokenizer(t, max_length))
            .map_err(LocalError::into_embedding_error)?;

        let model = SentenceModel::load(&files, device_manager.device(), config.normalize)
            .map_err(LocalError::into_embedding_error)?;

        info!(
            "Embedder ready on {} (dimension={})",
            device_manager.device_info(),
            model.hidden_size()
        );

        Ok(Self {
            config,
            device_manager,
            tokenizer,
            model,
        })
    }

    /// Configuration the embedder was built with.
    pub fn config(&self) -> &CandleEmbedderConfig {
        &self.config
    }

    /// Get device information.
    pub fn device_info(&self) -> String {
        self.device_manager.device_info()
    }

    async fn generate_embeddings(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let start_time = std::time::Instant::now();
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(self.config.batch_size.max(1)) {
            all_embeddings.extend(
                self.process_batch(chunk.to_vec())
                    .map_err(LocalError::into_embedding_error)?,
            );
        }

        debug!(
            "Generated {} embeddings in {:?}",
            all_embeddings.len(),
            start_time.elapsed()
        );

        Ok(all_embeddings)
    }

    fn process_batch(&self, texts: Vec<&str>) -> std::result::Result<Vec<Vec<f32>>, LocalError> {
        let tokenized = self.tokenizer.tokenize_batch(texts)?;
        let inputs = self
            .tokenizer
            .to_tensors(&tokenized, self.device_manager.device())?;
        let embeddings = self.model.embed(&inputs)?;
        tensor_to_embeddings(&embeddings)
    }
}

/// The configured length, capped by the model's own `max_seq_length`.
fn effective_max_length(
    configured: usize,
    sentence_config: Option<&Path>,
) -> std::result::Result<usize, LocalError> {
    let Some(path) = sentence_config else {
        return Ok(configured);
    };
    let content = std::fs::read_to_string(path)?;
    let parsed: SentenceTransformersConfig =
        serde_json::from_str(&content).map_err(|e| LocalError::ModelLoading {
            message: format!("Failed to parse {SENTENCE_TRANSFORMERS_CONFIG}: {e}"),
        })?;

    match parsed.max_seq_length {
        Some(limit) if limit < configured => {
            debug!("Capping max_length {} to model limit {}", configured, limit);
            Ok(limit)
        }
        _ => Ok(configured),
    }
}

fn tensor_to_embeddings(tensor: &Tensor) -> std::result::Result<Vec<Vec<f32>>, LocalError> {
    if tensor.dims().len() != 2 {
        return Err(LocalError::Inference {
            message: format!("Expected 2D tensor, got shape: {:?}", tensor.shape()),
        });
    }
    Ok(tensor.to_dtype(candle_core::DType::F32)?.to_vec2::<f32>()?)
}

#[async_trait]
impl Embedder for CandleEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.generate_embeddings(vec![text]).await?;
        Ok(embeddings.into_iter().next().unwrap_or_default())
    }

    async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
        self.generate_embeddings(texts).await
    }

    fn dimension(&self) -> usize {
        self.model.hidden_size()
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }

    fn name(&self) -> &'static str {
        "CandleEmbedder"
    }

    fn normalizes(&self) -> bool {
        self.config.normalize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tensor_rows_become_vectors() {
        let tensor = Tensor::new(&[[0.5f32, 1.5], [2.5, 3.5]], &Device::Cpu).unwrap();
        assert_eq!(
            tensor_to_embeddings(&tensor).unwrap(),
            vec![vec![0.5, 1.5], vec![2.5, 3.5]]
        );
    }

    #[test]
    fn test_non_matrix_output_is_rejected() {
        let tensor = Tensor::new(&[1.0f32, 2.0], &Device::Cpu).unwrap();
        assert!(matches!(
            tensor_to_embeddings(&tensor),
            Err(LocalError::Inference { .. })
        ));
    }

    #[test]
    fn test_model_limit_caps_configured_length() {
        let dir = std::env::temp_dir().join(format!("ragkit-st-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(SENTENCE_TRANSFORMERS_CONFIG);
        std::fs::write(&path, r#"{"max_seq_length": 256, "do_lower_case": false}"#).unwrap();

        assert_eq!(effective_max_length(512, Some(&path)).unwrap(), 256);
        assert_eq!(effective_max_length(128, Some(&path)).unwrap(), 128);
        assert_eq!(effective_max_length(512, None).unwrap(), 512);

        std::fs::write(&path, r#"{"do_lower_case": true}"#).unwrap();
        assert_eq!(effective_max_length(512, Some(&path)).unwrap(), 512);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
