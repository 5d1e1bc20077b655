//! Autoregressive text generation over a [`CausalModel`].
//!
//! The prompt is prefilled in one forward pass; afterwards one token is fed
//! per step and the KV cache carries the context. Logits go through the
//! repetition penalty and then the sampler. Generation stops at an
//! end-of-sequence token or after `max_new_tokens`.

use candle_core::{Device, Tensor};
use candle_transformers::generation::{LogitsProcessor, Sampling};
use ragkit_core::config::GenerationConfig;
use tokenizers::Tokenizer;
use tracing::debug;

use super::model::CausalModel;
use crate::local::LocalError;

/// Tokens that end a turn for the supported model families.
const STOP_TOKENS: [&str; 6] = [
    "<eos>",
    "</s>",
    "<end_of_turn>",
    "<|eot_id|>",
    "<|end_of_text|>",
    "<|im_end|>",
];

/// Why generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// An end-of-sequence token was produced.
    Stop,
    /// `max_new_tokens` was reached.
    Length,
}

impl FinishReason {
    /// OpenAI-style name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Length => "length",
        }
    }
}

/// Result of one generation run.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Decoded new tokens only.
    pub text: String,
    /// Prompt length in tokens.
    pub prompt_tokens: usize,
    /// Number of tokens generated.
    pub completion_tokens: usize,
    /// Why generation ended.
    pub finish_reason: FinishReason,
}

/// Model, tokenizer, and decoding parameters bundled for generation.
#[derive(Debug)]
pub struct TextGenerationPipeline {
    model: CausalModel,
    tokenizer: Tokenizer,
    device: Device,
    generation: GenerationConfig,
    stop_tokens: Vec<u32>,
}

impl TextGenerationPipeline {
    /// Assemble a pipeline.
    pub fn new(
        model: CausalModel,
        tokenizer: Tokenizer,
        device: Device,
        generation: GenerationConfig,
    ) -> Self {
        let stop_tokens: Vec<u32> = STOP_TOKENS
            .iter()
            .filter_map(|token| tokenizer.token_to_id(token))
            .collect();
        debug!("Stop token ids: {:?}", stop_tokens);

        Self {
            model,
            tokenizer,
            device,
            generation,
            stop_tokens,
        }
    }

    /// Generate a continuation of `prompt`.
    pub fn generate(&mut self, prompt: &str) -> Result<Generation, LocalError> {
        self.model.clear_kv_cache()?;

        let encoding =
            self.tokenizer
                .encode(prompt, true)
                .map_err(|e| LocalError::Tokenization {
                    message: format!("Failed to encode prompt: {e}"),
                })?;
        let mut tokens = encoding.get_ids().to_vec();
        let prompt_tokens = tokens.len();
        if prompt_tokens == 0 {
            return Err(LocalError::Tokenization {
                message: "Prompt encoded to zero tokens".to_string(),
            });
        }

        let mut sampler =
            LogitsProcessor::from_sampling(self.generation.seed, sampling(&self.generation));
        let mut generated = Vec::new();
        let mut finish_reason = FinishReason::Length;

        for step in 0..self.generation.max_new_tokens {
            let context_size = if step == 0 { tokens.len() } else { 1 };
            let start_pos = tokens.len() - context_size;
            let input = Tensor::new(&tokens[start_pos..], &self.device)?.unsqueeze(0)?;

            let logits = self.model.forward(&input, start_pos)?;
            let logits = if (self.generation.repetition_penalty - 1.0).abs() < f32::EPSILON {
                logits
            } else {
                let window_start = tokens.len().saturating_sub(self.generation.repeat_last_n);
                candle_transformers::utils::apply_repeat_penalty(
                    &logits,
                    self.generation.repetition_penalty,
                    &tokens[window_start..],
                )?
            };

            let next = sampler.sample(&logits)?;
            if self.stop_tokens.contains(&next) {
                finish_reason = FinishReason::Stop;
                break;
            }
            tokens.push(next);
            generated.push(next);
        }

        let text = self
            .tokenizer
            .decode(&generated, true)
            .map_err(|e| LocalError::Tokenization {
                message: format!("Failed to decode output: {e}"),
            })?;

        debug!(
            "Generated {} tokens ({})",
            generated.len(),
            finish_reason.as_str()
        );

        Ok(Generation {
            text: text.trim().to_string(),
            prompt_tokens,
            completion_tokens: generated.len(),
            finish_reason,
        })
    }
}

/// Sampling strategy for the decoding parameters.
///
/// Greedy when sampling is disabled or the temperature is zero.
pub(crate) fn sampling(generation: &GenerationConfig) -> Sampling {
    if !generation.do_sample || generation.temperature <= 0.0 {
        Sampling::ArgMax
    } else {
        Sampling::TopP {
            p: generation.top_p,
            temperature: f64::from(generation.temperature),
        }
    }
}
