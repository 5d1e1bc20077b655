//! Configuration for embedding backends.

use serde::{Deserialize, Serialize};

use crate::{RagkitError, Result};

/// Model name sent to the Azure OpenAI embeddings deployment.
pub const AZURE_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default sentence-embedding model run in-process.
pub const DEFAULT_HUGGINGFACE_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// An embedding provider selection together with its configuration.
///
/// # Examples
///
/// ```rust
/// use ragkit_core::config::EmbeddingBackend;
///
/// let local = EmbeddingBackend::huggingface("BAAI/bge-small-en-v1.5")
///     .with_batch_size(16)
///     .with_device("auto");
///
/// assert_eq!(local.model_name(), "BAAI/bge-small-en-v1.5");
/// assert!(local.is_local());
/// assert!(local.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum EmbeddingBackend {
    /// Azure OpenAI embeddings deployment, fixed to `text-embedding-3-small`.
    #[serde(rename = "azure_openai")]
    AzureOpenAi,

    /// BERT-family sentence-embedding model run locally.
    #[serde(rename = "huggingface")]
    HuggingFace {
        /// Hub model identifier.
        #[serde(default = "default_model_name")]
        model_name: String,

        /// Device to run on ("cpu", "cuda", "metal", "auto").
        #[serde(default = "default_device")]
        device: String,

        /// Whether to L2-normalize output vectors.
        #[serde(default)]
        normalize: bool,

        /// Number of texts per forward pass.
        #[serde(default = "default_batch_size")]
        batch_size: usize,

        /// Token limit per text; longer inputs are truncated.
        #[serde(default = "default_max_length")]
        max_length: usize,

        /// Hub revision.
        #[serde(default = "default_revision")]
        revision: String,
    },
}

fn default_model_name() -> String {
    DEFAULT_HUGGINGFACE_EMBEDDING_MODEL.to_string()
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_batch_size() -> usize {
    32
}

fn default_max_length() -> usize {
    512
}

fn default_revision() -> String {
    "main".to_string()
}

impl EmbeddingBackend {
    /// Local embedding model with default settings other than its name.
    pub fn huggingface<S: Into<String>>(model_name: S) -> Self {
        Self::HuggingFace {
            model_name: model_name.into(),
            device: default_device(),
            normalize: false,
            batch_size: default_batch_size(),
            max_length: default_max_length(),
            revision: default_revision(),
        }
    }

    /// Set the batch size for local embedders.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        if let Self::HuggingFace { batch_size: bs, .. } = &mut self {
            *bs = batch_size;
        }
        self
    }

    /// Set normalization for local embedders.
    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        if let Self::HuggingFace {
            normalize: norm, ..
        } = &mut self
        {
            *norm = normalize;
        }
        self
    }

    /// Set the device for local embedders.
    pub fn with_device<S: Into<String>>(mut self, device: S) -> Self {
        if let Self::HuggingFace { device: dev, .. } = &mut self {
            *dev = device.into();
        }
        self
    }

    /// Set the token limit for local embedders.
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        if let Self::HuggingFace { max_length: len, .. } = &mut self {
            *len = max_length;
        }
        self
    }

    /// Get the model name.
    #[must_use]
    pub fn model_name(&self) -> &str {
        match self {
            Self::AzureOpenAi => AZURE_EMBEDDING_MODEL,
            Self::HuggingFace { model_name, .. } => model_name,
        }
    }

    /// Tag naming the provider, as used in serialized records.
    #[must_use]
    pub fn provider(&self) -> &'static str {
        match self {
            Self::AzureOpenAi => "azure_openai",
            Self::HuggingFace { .. } => "huggingface",
        }
    }

    /// Check if this embedder runs in-process.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::HuggingFace { .. })
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if let Self::HuggingFace {
            model_name,
            device,
            batch_size,
            max_length,
            revision,
            ..
        } = self
        {
            if model_name.trim().is_empty() {
                return Err(RagkitError::configuration("Model name cannot be empty"));
            }
            if device.is_empty() {
                return Err(RagkitError::configuration("Device cannot be empty"));
            }
            if *batch_size == 0 {
                return Err(RagkitError::configuration(
                    "Batch size must be greater than 0",
                ));
            }
            if *max_length == 0 {
                return Err(RagkitError::configuration(
                    "Max length must be greater than 0",
                ));
            }
            if revision.is_empty() {
                return Err(RagkitError::configuration("Revision cannot be empty"));
            }
        }
        Ok(())
    }
}

impl Default for EmbeddingBackend {
    fn default() -> Self {
        Self::huggingface(DEFAULT_HUGGINGFACE_EMBEDDING_MODEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_local_defaults() {
        let backend = EmbeddingBackend::default();

        let EmbeddingBackend::HuggingFace {
            model_name,
            device,
            normalize,
            batch_size,
            max_length,
            revision,
        } = &backend
        else {
            panic!("default backend should be local");
        };

        assert_eq!(model_name, "sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(device, "cpu");
        assert!(!normalize);
        assert_eq!(*batch_size, 32);
        assert_eq!(*max_length, 512);
        assert_eq!(revision, "main");
        assert!(backend.validate().is_ok());
    }

    #[test]
    fn test_azure_model_is_fixed() {
        let backend = EmbeddingBackend::AzureOpenAi;
        assert_eq!(backend.model_name(), "text-embedding-3-small");
        assert!(!backend.is_local());

        // setters only touch local settings
        let backend = backend.with_batch_size(8).with_normalize(true);
        assert_eq!(backend, EmbeddingBackend::AzureOpenAi);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(EmbeddingBackend::AzureOpenAi).unwrap();
        assert_eq!(json, serde_json::json!({"provider": "azure_openai"}));

        let backend: EmbeddingBackend = serde_json::from_str(
            r#"{"provider": "huggingface", "model_name": "BAAI/bge-small-en-v1.5"}"#,
        )
        .unwrap();
        assert_eq!(backend, EmbeddingBackend::huggingface("BAAI/bge-small-en-v1.5"));
    }

    #[test]
    fn test_validation_errors() {
        assert!(EmbeddingBackend::huggingface("").validate().is_err());
        assert!(
            EmbeddingBackend::default()
                .with_batch_size(0)
                .validate()
                .is_err()
        );
        assert!(EmbeddingBackend::default().with_device("").validate().is_err());
        assert!(
            EmbeddingBackend::default()
                .with_max_length(0)
                .validate()
                .is_err()
        );
    }
}
