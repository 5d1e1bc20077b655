//! Tokenization for the Candle embedder.
//!
//! Texts are truncated to `max_length` tokens, special tokens included, and
//! each batch is padded to its longest member, so short batches do not pay
//! for the full window.

use candle_core::{Device, Tensor};
use tokenizers::{Encoding, Tokenizer, TruncationParams};
use tracing::debug;

use crate::local::LocalError;

/// Tokenizer wrapper for embedding models.
#[derive(Debug)]
pub struct EmbeddingTokenizer {
    tokenizer: Tokenizer,
    pad_token_id: u32,
}

impl EmbeddingTokenizer {
    /// Wrap a loaded tokenizer.
    ///
    /// Padding baked into `tokenizer.json` is cleared and truncation is
    /// replaced with `max_length`. The tokenizer truncates before adding
    /// special tokens, so `[CLS]` and `[SEP]` survive.
    pub fn from_tokenizer(mut tokenizer: Tokenizer, max_length: usize) -> Result<Self, LocalError> {
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| LocalError::Tokenization {
                message: format!("Failed to configure truncation: {e}"),
            })?;

        let vocab = tokenizer.get_vocab(true);
        let pad_token_id = vocab
            .get("[PAD]")
            .or_else(|| vocab.get("<pad>"))
            .copied()
            .unwrap_or(0);

        debug!(
            "Tokenizer initialized: max_length={}, pad_token_id={}",
            max_length, pad_token_id
        );

        Ok(Self {
            tokenizer,
            pad_token_id,
        })
    }

    /// Tokenize a batch of texts.
    pub fn tokenize_batch(&self, texts: Vec<&str>) -> Result<Vec<TokenizedInput>, LocalError> {
        let encodings =
            self.tokenizer
                .encode_batch(texts, true)
                .map_err(|e| LocalError::Tokenization {
                    message: format!("Failed to encode batch: {e}"),
                })?;

        Ok(encodings
            .into_iter()
            .map(|encoding| TokenizedInput::from(&encoding))
            .collect())
    }

    /// Pad a batch to its longest member and build tensors.
    pub fn to_tensors(
        &self,
        inputs: &[TokenizedInput],
        device: &Device,
    ) -> Result<ModelInputs, LocalError> {
        batch_tensors(inputs, self.pad_token_id, device)
    }
}

/// Tokenized input for a single text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedInput {
    /// Token IDs
    pub input_ids: Vec<u32>,
    /// Attention mask (1 for real tokens, 0 for padding)
    pub attention_mask: Vec<u32>,
    /// Token type IDs
    pub token_type_ids: Vec<u32>,
}

impl From<&Encoding> for TokenizedInput {
    fn from(encoding: &Encoding) -> Self {
        Self {
            input_ids: encoding.get_ids().to_vec(),
            attention_mask: encoding.get_attention_mask().to_vec(),
            token_type_ids: encoding.get_type_ids().to_vec(),
        }
    }
}

/// Model inputs as tensors of shape `[batch, seq_len]`.
#[derive(Debug)]
pub struct ModelInputs {
    /// Input token IDs
    pub input_ids: Tensor,
    /// Attention mask
    pub attention_mask: Tensor,
    /// Token type IDs
    pub token_type_ids: Tensor,
}

fn pad_sequence(sequence: &[u32], len: usize, pad_value: u32) -> Vec<u32> {
    let mut padded = sequence.to_vec();
    padded.resize(len, pad_value);
    padded
}

fn batch_tensors(
    inputs: &[TokenizedInput],
    pad_token_id: u32,
    device: &Device,
) -> Result<ModelInputs, LocalError> {
    if inputs.is_empty() {
        return Err(LocalError::Tokenization {
            message: "No inputs provided".to_string(),
        });
    }

    let batch_size = inputs.len();
    let seq_len = inputs
        .iter()
        .map(|input| input.input_ids.len())
        .max()
        .unwrap_or(0);

    let mut all_input_ids = Vec::with_capacity(batch_size * seq_len);
    let mut all_attention_mask = Vec::with_capacity(batch_size * seq_len);
    let mut all_token_type_ids = Vec::with_capacity(batch_size * seq_len);

    for input in inputs {
        all_input_ids.extend(pad_sequence(&input.input_ids, seq_len, pad_token_id));
        all_attention_mask.extend(pad_sequence(&input.attention_mask, seq_len, 0));
        all_token_type_ids.extend(pad_sequence(&input.token_type_ids, seq_len, 0));
    }

    let shape = (batch_size, seq_len);
    Ok(ModelInputs {
        input_ids: Tensor::from_vec(all_input_ids, shape, device)?,
        attention_mask: Tensor::from_vec(all_attention_mask, shape, device)?,
        token_type_ids: Tensor::from_vec(all_token_type_ids, shape, device)?,
    })
}
