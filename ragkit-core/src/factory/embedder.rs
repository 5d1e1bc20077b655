//! Factory trait for embedding clients.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{Result, config::EmbeddingBackend, traits::Embedder};

/// Creates embedders from a backend selection.
#[async_trait]
pub trait EmbedderFactory: Send + Sync + std::fmt::Debug {
    /// Create an embedder for the given backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, required
    /// environment values are missing, or the model cannot be loaded.
    async fn create_embedder(&self, backend: &EmbeddingBackend) -> Result<Arc<dyn Embedder>>;

    /// Provider tags this factory can build.
    fn supported_providers(&self) -> Vec<&'static str>;

    /// Check if this factory can build an embedder for the given backend.
    fn can_create(&self, backend: &EmbeddingBackend) -> bool {
        self.supported_providers().contains(&backend.provider())
    }

    /// Get a human-readable name for this factory.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Validate the configuration without creating the embedder.
    async fn validate_config(&self, backend: &EmbeddingBackend) -> Result<()> {
        backend.validate()
    }

    /// Get metadata about this factory.
    fn metadata(&self) -> std::collections::HashMap<String, serde_json::Value> {
        let mut metadata = std::collections::HashMap::new();
        metadata.insert("name".to_string(), self.name().into());
        metadata.insert(
            "supported_providers".to_string(),
            self.supported_providers().into(),
        );
        metadata
    }
}
