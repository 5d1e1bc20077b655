//! The embedding-client factory.

use std::sync::Arc;

use async_trait::async_trait;
use ragkit_core::config::{AzureDeployment, EmbeddingBackend, EnvSource, ProcessEnv};
use ragkit_core::factory::EmbedderFactory;
use ragkit_core::{Embedder, Result};
use tracing::{info, instrument};

use crate::embedders::AzureEmbedder;

/// Builds embedding clients for every supported backend.
///
/// # Examples
///
/// ```rust,no_run
/// use ragkit_integrations::Embeddings;
///
/// # async fn example() -> ragkit_core::Result<()> {
/// let embedder = Embeddings::new().huggingface(None).await?;
/// let vectors = embedder.embed_batch(vec!["first", "second"]).await?;
/// assert_eq!(vectors.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Embeddings {
    env: Arc<dyn EnvSource>,
}

impl Default for Embeddings {
    fn default() -> Self {
        Self::new()
    }
}

impl Embeddings {
    /// Factory over the process environment, after loading `.env` if present.
    pub fn new() -> Self {
        Self::with_env(Arc::new(ProcessEnv::with_dotenv()))
    }

    /// Factory over an explicit environment source.
    pub fn with_env(env: Arc<dyn EnvSource>) -> Self {
        Self { env }
    }

    /// Azure OpenAI embedding deployment serving `text-embedding-3-small`.
    pub async fn azure_openai(&self) -> Result<Arc<dyn Embedder>> {
        self.create(&EmbeddingBackend::AzureOpenAi).await
    }

    /// Sentence-transformers model run in-process on the CPU, without
    /// normalization. Defaults to `sentence-transformers/all-MiniLM-L6-v2`.
    pub async fn huggingface(&self, model_name: Option<&str>) -> Result<Arc<dyn Embedder>> {
        let backend = model_name.map_or_else(EmbeddingBackend::default, |name| {
            EmbeddingBackend::huggingface(name)
        });
        self.create(&backend).await
    }

    /// Build a client for any backend.
    #[instrument(skip(self), fields(provider = backend.provider()))]
    pub async fn create(&self, backend: &EmbeddingBackend) -> Result<Arc<dyn Embedder>> {
        backend.validate()?;

        let embedder: Arc<dyn Embedder> = match backend {
            EmbeddingBackend::AzureOpenAi => {
                let deployment = AzureDeployment::embedding_from_env(self.env.as_ref())?;
                Arc::new(AzureEmbedder::new(deployment)?)
            }
            EmbeddingBackend::HuggingFace { .. } => self.create_local(backend).await?,
        };

        info!(
            "Created {} embedder for model {}",
            backend.provider(),
            embedder.model_name()
        );
        Ok(embedder)
    }

    #[cfg(feature = "local")]
    async fn create_local(&self, backend: &EmbeddingBackend) -> Result<Arc<dyn Embedder>> {
        use crate::embedders::{CandleEmbedder, CandleEmbedderConfig};
        use ragkit_core::config::HubCredentials;

        let config = CandleEmbedderConfig::try_from(backend)?;
        let credentials = HubCredentials::optional_from_env(self.env.as_ref());
        Ok(Arc::new(CandleEmbedder::load(config, credentials).await?))
    }

    #[cfg(not(feature = "local"))]
    async fn create_local(&self, _backend: &EmbeddingBackend) -> Result<Arc<dyn Embedder>> {
        Err(ragkit_core::RagkitError::configuration(
            "The huggingface backend requires the `local` feature",
        ))
    }
}

#[async_trait]
impl EmbedderFactory for Embeddings {
    async fn create_embedder(&self, backend: &EmbeddingBackend) -> Result<Arc<dyn Embedder>> {
        self.create(backend).await
    }

    fn supported_providers(&self) -> Vec<&'static str> {
        let mut providers = vec!["azure_openai"];
        if cfg!(feature = "local") {
            providers.push("huggingface");
        }
        providers
    }

    fn name(&self) -> &'static str {
        "Embeddings"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ragkit_core::RagkitError;
    use ragkit_core::config::{MapEnv, vars};

    #[tokio::test]
    async fn test_azure_embedder_records_deployment() {
        let env = MapEnv::new()
            .with(vars::AZURE_OPENAI_ENDPOINT, "https://res.openai.azure.com/")
            .with(vars::AZURE_OPENAI_EMBEDDING_DEPLOYMENT_NAME, "embed-small")
            .with(vars::AZURE_OPENAI_EMBEDDING_API_VERSION, "2024-02-01")
            .with(vars::AZURE_OPENAI_API_KEY, "key");

        let embedder = Embeddings::with_env(Arc::new(env))
            .azure_openai()
            .await
            .unwrap();

        assert_eq!(embedder.model_name(), "text-embedding-3-small");
        assert_eq!(embedder.dimension(), 1536);
        assert!(!embedder.normalizes());
    }

    #[tokio::test]
    async fn test_azure_embedder_needs_its_own_deployment_variable() {
        // chat variables do not satisfy the embedding path
        let env = MapEnv::new()
            .with(vars::AZURE_OPENAI_ENDPOINT, "https://res.openai.azure.com")
            .with(vars::AZURE_OPENAI_CHAT_DEPLOYMENT_NAME, "gpt-4o")
            .with(vars::AZURE_OPENAI_CHAT_API_VERSION, "2024-02-01")
            .with(vars::AZURE_OPENAI_API_KEY, "key");

        let err = Embeddings::with_env(Arc::new(env))
            .azure_openai()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RagkitError::MissingEnvVar { ref name } if name == "AZURE_OPENAI_EMBEDDING_DEPLOYMENT_NAME"
        ));
    }

    #[tokio::test]
    async fn test_invalid_local_record_is_rejected_before_download() {
        let backend = EmbeddingBackend::default().with_batch_size(0);
        let err = Embeddings::with_env(Arc::new(MapEnv::new()))
            .create(&backend)
            .await
            .unwrap_err();
        assert!(err.is_configuration_error());
    }
}
