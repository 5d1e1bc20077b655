//! Shared plumbing for models run in-process with Candle.
//!
//! - `device`: CPU/CUDA/Metal selection
//! - `hub`: scoped-credential downloads from the Hugging Face Hub
//! - `error`: [`LocalError`] and its conversion at the client seam

pub mod device;
pub mod error;
pub mod hub;
#[cfg(test)]
pub(crate) mod test_support;

pub use device::{DeviceManager, DeviceType};
pub use error::LocalError;
pub use hub::{HubDownloader, ModelFiles};

use candle_core::{DType, Device};
use candle_nn::VarBuilder;

/// Load weight files into a [`VarBuilder`].
///
/// Single-file and sharded checkpoints are handled the same way.
pub(crate) fn load_weights(
    files: &ModelFiles,
    dtype: DType,
    device: &Device,
) -> Result<VarBuilder<'static>, LocalError> {
    let mut tensors = std::collections::HashMap::new();
    for path in &files.weights {
        let shard = candle_core::safetensors::load(path, device).map_err(|e| {
            LocalError::ModelLoading {
                message: format!("Failed to load weights from {}: {e}", path.display()),
            }
        })?;
        tensors.extend(shard);
    }
    Ok(VarBuilder::from_tensors(tensors, dtype, device))
}

/// Parse a model's `config.json`.
pub(crate) fn read_config<T: serde::de::DeserializeOwned>(
    files: &ModelFiles,
) -> Result<T, LocalError> {
    let content = std::fs::read_to_string(&files.config)?;
    serde_json::from_str(&content).map_err(|e| LocalError::ModelLoading {
        message: format!("Failed to parse config.json: {e}"),
    })
}

/// Load `tokenizer.json`.
pub(crate) fn read_tokenizer(files: &ModelFiles) -> Result<tokenizers::Tokenizer, LocalError> {
    tokenizers::Tokenizer::from_file(&files.tokenizer).map_err(|e| LocalError::ModelLoading {
        message: format!("Failed to load tokenizer: {e}"),
    })
}
