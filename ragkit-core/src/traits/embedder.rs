//! Embedding generation trait.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::Result;

/// Generates dense embeddings for text content.
///
/// # Examples
///
/// ```rust,no_run
/// use ragkit_core::traits::Embedder;
/// use ragkit_core::Result;
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct ConstantEmbedder {
///     dimension: usize,
/// }
///
/// #[async_trait]
/// impl Embedder for ConstantEmbedder {
///     async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
///         Ok(vec![0.1; self.dimension])
///     }
///
///     async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
///         Ok(texts.iter().map(|_| vec![0.1; self.dimension]).collect())
///     }
///
///     fn dimension(&self) -> usize {
///         self.dimension
///     }
///
///     fn model_name(&self) -> &str {
///         "constant"
///     }
/// }
/// ```
#[async_trait]
pub trait Embedder: Send + Sync + std::fmt::Debug {
    /// Generate the embedding for a single text.
    ///
    /// The length of the result matches [`Embedder::dimension`].
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for several texts.
    ///
    /// The result holds one vector per input, in input order. An empty input
    /// yields an empty result.
    async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>>;

    /// Dimension of the vectors this embedder produces.
    ///
    /// Remote embedders may report 0 until the first response has been seen.
    fn dimension(&self) -> usize;

    /// Name of the embedding model.
    fn model_name(&self) -> &str;

    /// Get a human-readable name for this embedder.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Whether output vectors are L2-normalized.
    fn normalizes(&self) -> bool {
        false
    }

    /// Get metadata about the embedding model.
    fn metadata(&self) -> HashMap<String, serde_json::Value> {
        let mut metadata = HashMap::new();
        metadata.insert("model_name".to_string(), self.model_name().into());
        metadata.insert("dimension".to_string(), self.dimension().into());
        metadata.insert("normalize".to_string(), self.normalizes().into());
        metadata
    }
}
