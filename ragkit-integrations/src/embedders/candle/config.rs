//! Configuration for the Candle embedder.

use ragkit_core::config::{DEFAULT_HUGGINGFACE_EMBEDDING_MODEL, EmbeddingBackend};
use ragkit_core::{RagkitError, Result};

/// Settings for a locally run sentence-embedding model.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleEmbedderConfig {
    /// Hub model identifier (e.g. "sentence-transformers/all-MiniLM-L6-v2")
    pub model_name: String,

    /// Hub revision (default: "main")
    pub revision: String,

    /// Token limit per text
    pub max_length: usize,

    /// Whether to L2-normalize embeddings
    pub normalize: bool,

    /// Texts per forward pass
    pub batch_size: usize,

    /// Device preference ("auto", "cpu", "cuda", "metal")
    pub device: String,
}

impl Default for CandleEmbedderConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_HUGGINGFACE_EMBEDDING_MODEL.to_string(),
            revision: "main".to_string(),
            max_length: 512,
            normalize: false,
            batch_size: 32,
            device: "cpu".to_string(),
        }
    }
}

impl CandleEmbedderConfig {
    /// Create a new configuration with the specified model name.
    pub fn new<S: Into<String>>(model_name: S) -> Self {
        Self {
            model_name: model_name.into(),
            ..Default::default()
        }
    }

    /// Set whether to normalize embeddings.
    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

impl TryFrom<&EmbeddingBackend> for CandleEmbedderConfig {
    type Error = RagkitError;

    fn try_from(backend: &EmbeddingBackend) -> Result<Self> {
        backend.validate()?;
        match backend {
            EmbeddingBackend::HuggingFace {
                model_name,
                device,
                normalize,
                batch_size,
                max_length,
                revision,
            } => Ok(Self {
                model_name: model_name.clone(),
                revision: revision.clone(),
                max_length: *max_length,
                normalize: *normalize,
                batch_size: *batch_size,
                device: device.clone(),
            }),
            other => Err(RagkitError::configuration(format!(
                "Backend '{}' is not a local embedding model",
                other.provider()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_the_backend_defaults() {
        let from_backend = CandleEmbedderConfig::try_from(&EmbeddingBackend::default()).unwrap();
        assert_eq!(from_backend, CandleEmbedderConfig::default());
        assert!(!from_backend.normalize);
        assert_eq!(from_backend.device, "cpu");
    }

    #[test]
    fn test_backend_fields_are_carried_over() {
        let backend = EmbeddingBackend::huggingface("BAAI/bge-small-en-v1.5")
            .with_batch_size(8)
            .with_normalize(true);
        let config = CandleEmbedderConfig::try_from(&backend).unwrap();

        assert_eq!(
            config,
            CandleEmbedderConfig::new("BAAI/bge-small-en-v1.5")
                .with_batch_size(8)
                .with_normalize(true)
        );
    }

    #[test]
    fn test_azure_backend_is_rejected() {
        let err = CandleEmbedderConfig::try_from(&EmbeddingBackend::AzureOpenAi).unwrap_err();
        assert!(err.is_configuration_error());
    }
}
