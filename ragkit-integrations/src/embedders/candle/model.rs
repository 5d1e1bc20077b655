//! BERT-family sentence-embedding model.
//!
//! Token embeddings from the encoder are mean-pooled over the attention mask.
//! L2 normalization is applied only when configured.

use candle_core::{DType, Device, Tensor};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tracing::{debug, info};

use super::tokenizer::ModelInputs;
use crate::local::{LocalError, ModelFiles, load_weights, read_config};

/// A loaded BERT encoder plus pooling settings.
pub struct SentenceModel {
    bert: BertModel,
    hidden_size: usize,
    normalize: bool,
}

impl std::fmt::Debug for SentenceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceModel")
            .field("hidden_size", &self.hidden_size)
            .field("normalize", &self.normalize)
            .finish_non_exhaustive()
    }
}

impl SentenceModel {
    /// Load config and weights onto `device`.
    pub fn load(files: &ModelFiles, device: &Device, normalize: bool) -> Result<Self, LocalError> {
        let config: BertConfig = read_config(files)?;
        let vb = load_weights(files, DType::F32, device)?;

        let bert = BertModel::load(vb, &config).map_err(|e| LocalError::ModelLoading {
            message: format!("Failed to create BERT model: {e}"),
        })?;

        info!(
            "BERT model loaded (hidden_size={}, layers={})",
            config.hidden_size, config.num_hidden_layers
        );

        Ok(Self {
            bert,
            hidden_size: config.hidden_size,
            normalize,
        })
    }

    /// Embed a padded batch; returns a `[batch, hidden_size]` tensor.
    pub fn embed(&self, inputs: &ModelInputs) -> Result<Tensor, LocalError> {
        debug!("Running BERT forward pass on {:?}", inputs.input_ids.dims());

        let sequence_output = self
            .bert
            .forward(
                &inputs.input_ids,
                &inputs.token_type_ids,
                Some(&inputs.attention_mask),
            )
            .map_err(|e| LocalError::Inference {
                message: format!("BERT forward pass failed: {e}"),
            })?;

        let pooled = mean_pool(&sequence_output, &inputs.attention_mask)?;

        if self.normalize {
            Ok(l2_normalize(&pooled)?)
        } else {
            Ok(pooled)
        }
    }

    /// Output vector length.
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }
}

/// Average token embeddings, ignoring padded positions.
pub(crate) fn mean_pool(
    sequence_output: &Tensor,
    attention_mask: &Tensor,
) -> candle_core::Result<Tensor> {
    let mask = attention_mask
        .unsqueeze(2)?
        .expand(sequence_output.shape())?
        .to_dtype(sequence_output.dtype())?;

    let summed = sequence_output.mul(&mask)?.sum(1)?;
    let counts = mask.sum(1)?.clamp(1e-9, f64::INFINITY)?;
    summed.div(&counts)
}

/// Scale each row to unit length.
pub(crate) fn l2_normalize(embeddings: &Tensor) -> candle_core::Result<Tensor> {
    let norm = embeddings.sqr()?.sum_keepdim(1)?.sqrt()?;
    embeddings.broadcast_div(&norm)
}
