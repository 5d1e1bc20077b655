//! Azure OpenAI embeddings.

use async_trait::async_trait;
use ragkit_core::config::{AZURE_EMBEDDING_MODEL, AzureDeployment};
use ragkit_core::{Embedder, RagkitError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::azure::AzureHttp;

/// Vector length of `text-embedding-3-small`.
pub const AZURE_EMBEDDING_DIMENSION: usize = 1536;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [&'a str],
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

/// Embedding client for an Azure OpenAI embedding deployment.
///
/// Requests always name `text-embedding-3-small`; the deployment decides
/// which model actually serves them.
#[derive(Debug, Clone)]
pub struct AzureEmbedder {
    http: AzureHttp,
}

impl AzureEmbedder {
    /// Bind a client to `deployment`. No request is made.
    pub fn new(deployment: AzureDeployment) -> Result<Self> {
        info!(
            "Creating Azure OpenAI embedder: deployment={}, api_version={}",
            deployment.deployment, deployment.api_version
        );
        Ok(Self {
            http: AzureHttp::new(deployment)?,
        })
    }

    /// The deployment this client is bound to.
    pub fn deployment(&self) -> &AzureDeployment {
        self.http.deployment()
    }
}

#[async_trait]
impl Embedder for AzureEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(vec![text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| RagkitError::embedding("Azure OpenAI returned no embedding"))
    }

    async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!("Requesting {} embeddings", texts.len());

        let request = EmbeddingRequest {
            input: &texts,
            model: AZURE_EMBEDDING_MODEL,
        };
        let response: EmbeddingResponse = self
            .http
            .post(&self.deployment().embeddings_url(), &request)
            .await
            .map_err(|e| RagkitError::embedding(e.to_string()))?;

        if response.data.len() != texts.len() {
            return Err(RagkitError::embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            )));
        }

        let mut data = response.data;
        data.sort_by_key(|item| item.index);
        Ok(data.into_iter().map(|item| item.embedding).collect())
    }

    fn dimension(&self) -> usize {
        AZURE_EMBEDDING_DIMENSION
    }

    fn model_name(&self) -> &str {
        AZURE_EMBEDDING_MODEL
    }

    fn name(&self) -> &'static str {
        "AzureEmbedder"
    }
}
