//! Error types for in-process inference.

use ragkit_core::RagkitError;
use thiserror::Error;

/// Errors raised while fetching, loading, or running a local model.
#[derive(Error, Debug)]
pub enum LocalError {
    /// The hub rejected or required credentials.
    #[error("Hub authentication failed: {message}")]
    Authentication {
        /// Error message
        message: String,
    },

    /// Model files could not be fetched or loaded.
    #[error("Model loading failed: {message}")]
    ModelLoading {
        /// Error message
        message: String,
    },

    /// Tokenizer load, encode, or decode failure.
    #[error("Tokenization failed: {message}")]
    Tokenization {
        /// Error message
        message: String,
    },

    /// Device initialization errors
    #[error("Device initialization failed: {message}")]
    Device {
        /// Error message
        message: String,
    },

    /// Forward pass or sampling failure.
    #[error("Model inference failed: {message}")]
    Inference {
        /// Error message
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Candle core errors
    #[error("Candle error: {0}")]
    Candle(#[from] candle_core::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LocalError {
    /// Convert for a chat client; inference failures become [`RagkitError::Llm`].
    pub fn into_llm_error(self) -> RagkitError {
        self.into_ragkit(RagkitError::llm)
    }

    /// Convert for an embedder; inference failures become [`RagkitError::Embedding`].
    pub fn into_embedding_error(self) -> RagkitError {
        self.into_ragkit(RagkitError::embedding)
    }

    fn into_ragkit(self, inference: fn(String) -> RagkitError) -> RagkitError {
        match self {
            Self::Authentication { message } => RagkitError::authentication(message),
            Self::ModelLoading { message } => RagkitError::model_loading(message),
            Self::Io(err) => RagkitError::model_loading(err.to_string()),
            Self::Configuration { message } | Self::Device { message } => {
                RagkitError::configuration(message)
            }
            other @ (Self::Tokenization { .. } | Self::Inference { .. } | Self::Candle(_)) => {
                inference(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_errors_keep_their_category() {
        let err = LocalError::Authentication {
            message: "401".to_string(),
        };
        assert!(matches!(
            err.into_embedding_error(),
            RagkitError::Authentication { .. }
        ));

        let err = LocalError::ModelLoading {
            message: "no weights".to_string(),
        };
        assert!(matches!(
            err.into_llm_error(),
            RagkitError::ModelLoading { .. }
        ));
    }

    #[test]
    fn test_inference_errors_follow_the_client_kind() {
        let chat = LocalError::Inference {
            message: "bad logits".to_string(),
        }
        .into_llm_error();
        assert!(matches!(chat, RagkitError::Llm { .. }));

        let embed = LocalError::Tokenization {
            message: "bad utf8".to_string(),
        }
        .into_embedding_error();
        assert!(matches!(embed, RagkitError::Embedding { .. }));
        assert!(embed.to_string().contains("bad utf8"));
    }
}
