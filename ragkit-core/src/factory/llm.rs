//! Factory trait for chat clients.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{Result, config::ChatBackend, traits::ChatModel};

/// Creates chat clients from a backend selection.
///
/// # Examples
///
/// ```rust,no_run
/// use ragkit_core::config::ChatBackend;
/// use ragkit_core::factory::LlmFactory;
/// use ragkit_core::traits::ChatModel;
/// use ragkit_core::{RagkitError, Result};
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct OnlyGroq;
///
/// #[async_trait]
/// impl LlmFactory for OnlyGroq {
///     async fn create_llm(&self, backend: &ChatBackend) -> Result<Arc<dyn ChatModel>> {
///         Err(RagkitError::configuration("not wired up"))
///     }
///
///     fn supported_providers(&self) -> Vec<&'static str> {
///         vec!["groq"]
///     }
/// }
/// ```
#[async_trait]
pub trait LlmFactory: Send + Sync + std::fmt::Debug {
    /// Create a chat client for the given backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, required
    /// environment values are missing, or the client cannot be initialized.
    async fn create_llm(&self, backend: &ChatBackend) -> Result<Arc<dyn ChatModel>>;

    /// Provider tags this factory can build.
    fn supported_providers(&self) -> Vec<&'static str>;

    /// Check if this factory can build a client for the given backend.
    fn can_create(&self, backend: &ChatBackend) -> bool {
        self.supported_providers().contains(&backend.provider())
    }

    /// Get a human-readable name for this factory.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Validate the configuration without creating a client.
    async fn validate_config(&self, backend: &ChatBackend) -> Result<()> {
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
