//! Causal language models supported for in-process generation.
//!
//! The architecture is chosen from `model_type` in the checkpoint's
//! `config.json`.

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::{gemma, gemma2, llama, mistral, qwen2};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::local::{LocalError, ModelFiles, load_weights};

const SUPPORTED_ARCHITECTURES: [&str; 5] = ["gemma", "gemma2", "llama", "mistral", "qwen2"];

#[derive(Debug, Deserialize)]
struct ModelTypeField {
    model_type: String,
}

/// A loaded decoder-only model with its KV cache.
pub enum CausalModel {
    /// Gemma (1.x)
    Gemma(gemma::Model),
    /// Gemma 2
    Gemma2(gemma2::Model),
    /// Llama 2 and 3
    Llama(LlamaModel),
    /// Mistral
    Mistral(mistral::Model),
    /// Qwen 2 and 2.5
    Qwen2(qwen2::ModelForCausalLM),
}

/// Llama weights together with their externally held KV cache.
pub struct LlamaModel {
    model: llama::Llama,
    cache: llama::Cache,
    config: llama::Config,
    dtype: DType,
    device: Device,
}

impl LlamaModel {
    fn new(
        config: llama::LlamaConfig,
        vb: VarBuilder<'_>,
        dtype: DType,
        device: &Device,
    ) -> Result<Self, LocalError> {
        let config = config.into_config(false);
        let cache = llama::Cache::new(true, dtype, &config, device).map_err(load_error)?;
        let model = llama::Llama::load(vb, &config).map_err(load_error)?;
        Ok(Self {
            model,
            cache,
            config,
            dtype,
            device: device.clone(),
        })
    }
}

impl std::fmt::Debug for CausalModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CausalModel").field(&self.architecture()).finish()
    }
}

impl CausalModel {
    /// Load the checkpoint described by `files` onto `device`.
    ///
    /// Unsupported architectures are rejected before any weights are read.
    pub fn load(files: &ModelFiles, device: &Device) -> Result<Self, LocalError> {
        let config = std::fs::read_to_string(&files.config)?;
        let architecture = supported_architecture(&config)?;

        let dtype = if device.is_cuda() {
            DType::BF16
        } else {
            DType::F32
        };
        let vb = load_weights(files, dtype, device)?;
        let model = Self::from_config(&architecture, &config, vb, dtype, device)?;

        info!(
            "Loaded {} model with dtype {:?}",
            model.architecture(),
            dtype
        );
        Ok(model)
    }

    /// Build a model of `architecture` from `config.json` text and weights.
    pub(crate) fn from_config(
        architecture: &str,
        config: &str,
        vb: VarBuilder<'_>,
        dtype: DType,
        device: &Device,
    ) -> Result<Self, LocalError> {
        let model = match architecture {
            "gemma" => {
                let config: gemma::Config = parse_config(config)?;
                Self::Gemma(gemma::Model::new(false, &config, vb).map_err(load_error)?)
            }
            "gemma2" => {
                let config: gemma2::Config = parse_config(config)?;
                Self::Gemma2(gemma2::Model::new(false, &config, vb).map_err(load_error)?)
            }
            "llama" => Self::Llama(LlamaModel::new(parse_config(config)?, vb, dtype, device)?),
            "mistral" => {
                let config: mistral::Config = parse_config(config)?;
                Self::Mistral(mistral::Model::new(&config, vb).map_err(load_error)?)
            }
            "qwen2" => {
                let config: qwen2::Config = parse_config(config)?;
                Self::Qwen2(qwen2::ModelForCausalLM::new(&config, vb).map_err(load_error)?)
            }
            other => return Err(unsupported(other)),
        };
        Ok(model)
    }

    /// Architecture name as written in `config.json`.
    pub fn architecture(&self) -> &'static str {
        match self {
            Self::Gemma(_) => "gemma",
            Self::Gemma2(_) => "gemma2",
            Self::Llama(_) => "llama",
            Self::Mistral(_) => "mistral",
            Self::Qwen2(_) => "qwen2",
        }
    }

    /// Run `input` (shape `[1, seq]`) starting at `offset` and return the
    /// last-position logits as a 1-D `f32` tensor.
    pub fn forward(&mut self, input: &Tensor, offset: usize) -> Result<Tensor, LocalError> {
        let logits = match self {
            Self::Gemma(model) => model.forward(input, offset)?,
            Self::Gemma2(model) => model.forward(input, offset)?,
            Self::Llama(llama) => llama.model.forward(input, offset, &mut llama.cache)?,
            Self::Mistral(model) => model.forward(input, offset)?,
            Self::Qwen2(model) => model.forward(input, offset)?,
        };
        // [1, 1, vocab] for most families, [1, vocab] for llama
        Ok(logits.flatten_all()?.to_dtype(DType::F32)?)
    }

    /// Drop cached keys and values so the next call starts a new sequence.
    pub fn clear_kv_cache(&mut self) -> Result<(), LocalError> {
        match self {
            Self::Gemma(model) => model.clear_kv_cache(),
            Self::Gemma2(model) => model.clear_kv_cache(),
            Self::Llama(llama) => {
                llama.cache = llama::Cache::new(true, llama.dtype, &llama.config, &llama.device)?;
            }
            Self::Mistral(model) => model.clear_kv_cache(),
            Self::Qwen2(model) => model.clear_kv_cache(),
        }
        Ok(())
    }
}

/// The `model_type` of a `config.json`, if it is one we can run.
fn supported_architecture(config: &str) -> Result<String, LocalError> {
    let field: ModelTypeField = parse_config(config)?;
    if SUPPORTED_ARCHITECTURES.contains(&field.model_type.as_str()) {
        Ok(field.model_type)
    } else {
        Err(unsupported(&field.model_type))
    }
}

fn parse_config<T: DeserializeOwned>(config: &str) -> Result<T, LocalError> {
    serde_json::from_str(config).map_err(|e| LocalError::ModelLoading {
        message: format!("Failed to parse config.json: {e}"),
    })
}

fn unsupported(architecture: &str) -> LocalError {
    LocalError::ModelLoading {
        message: format!(
            "Unsupported model architecture '{architecture}'; expected one of {}",
            SUPPORTED_ARCHITECTURES.join(", ")
        ),
    }
}

fn load_error(err: candle_core::Error) -> LocalError {
    LocalError::ModelLoading {
        message: format!("Failed to build model from weights: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::test_support::{TINY_VOCAB_SIZE, tiny_llama_config, tiny_qwen2_config};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn zero_model(architecture: &str, config: &str) -> CausalModel {
        let vb = VarBuilder::zeros(DType::F32, &Device::Cpu);
        CausalModel::from_config(architecture, config, vb, DType::F32, &Device::Cpu).unwrap()
    }

    #[test]
    fn test_unknown_architecture_is_a_loading_error() {
        let dir = std::env::temp_dir().join(format!("ragkit-arch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = dir.join("config.json");
        std::fs::write(&config, r#"{"model_type": "gpt_neox"}"#).unwrap();

        let files = ModelFiles {
            config,
            tokenizer: dir.join("tokenizer.json"),
            weights: vec![],
        };
        let err = CausalModel::load(&files, &Device::Cpu).unwrap_err();
        assert!(err.to_string().contains("gpt_neox"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test_case("llama" ; "llama")]
    #[test_case("qwen2" ; "qwen2")]
    #[test_case("gemma" ; "gemma")]
    #[test_case("mistral" ; "mistral")]
    fn test_supported_architectures_pass_the_check(architecture: &str) {
        let config = format!(r#"{{"model_type": "{architecture}"}}"#);
        assert_eq!(supported_architecture(&config).unwrap(), architecture);
    }

    #[test]
    fn test_llama_config_builds_a_llama_model() {
        let mut model = zero_model("llama", &tiny_llama_config());
        assert_eq!(model.architecture(), "llama");

        let prompt = Tensor::new(&[[1u32, 2, 3]], &Device::Cpu).unwrap();
        let logits = model.forward(&prompt, 0).unwrap();
        assert_eq!(logits.dims(), &[TINY_VOCAB_SIZE]);

        let next = Tensor::new(&[[4u32]], &Device::Cpu).unwrap();
        assert_eq!(model.forward(&next, 3).unwrap().dims(), &[TINY_VOCAB_SIZE]);

        // a fresh cache accepts a new sequence at offset 0
        model.clear_kv_cache().unwrap();
        assert_eq!(model.forward(&prompt, 0).unwrap().dims(), &[TINY_VOCAB_SIZE]);
    }

    #[test]
    fn test_qwen2_config_builds_a_qwen2_model() {
        let mut model = zero_model("qwen2", &tiny_qwen2_config());
        assert_eq!(model.architecture(), "qwen2");

        let prompt = Tensor::new(&[[1u32, 2, 3]], &Device::Cpu).unwrap();
        assert_eq!(model.forward(&prompt, 0).unwrap().dims(), &[TINY_VOCAB_SIZE]);

        model.clear_kv_cache().unwrap();
        assert_eq!(model.forward(&prompt, 0).unwrap().dims(), &[TINY_VOCAB_SIZE]);
    }

    #[test]
    fn test_incomplete_llama_config_is_a_loading_error() {
        let vb = VarBuilder::zeros(DType::F32, &Device::Cpu);
        let err = CausalModel::from_config(
            "llama",
            r#"{"model_type": "llama"}"#,
            vb,
            DType::F32,
            &Device::Cpu,
        )
        .unwrap_err();
        assert!(matches!(err, LocalError::ModelLoading { .. }));
        assert!(!err.to_string().contains("Unsupported"));
    }
}
