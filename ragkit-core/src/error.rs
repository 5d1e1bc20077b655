//! Error types for ragkit.
//!
//! Every factory operation either returns a fully constructed client or one of
//! these errors. Errors raised by backend libraries are converted at the seam
//! where they occur and are otherwise passed through untouched.

use thiserror::Error;

/// Core error type for ragkit.
///
/// Covers configuration lookups, hub authentication, model loading, and
/// failures reported by a constructed chat or embedding client.
#[derive(Error, Debug)]
pub enum RagkitError {
    /// I/O related errors (reading model files, config files, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A required environment variable is absent or empty
    #[error("Configuration error: missing environment variable {name}")]
    MissingEnvVar {
        /// Name of the variable that was looked up
        name: String,
    },

    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// Detailed error message
        message: String,
    },

    /// Hub authentication failures
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Detailed error message
        message: String,
    },

    /// Model, tokenizer, or weight files could not be fetched or loaded
    #[error("Model loading error: {message}")]
    ModelLoading {
        /// Detailed error message
        message: String,
    },

    /// Chat client errors
    #[error("LLM error: {message}")]
    Llm {
        /// Detailed error message
        message: String,
    },

    /// Embedding client errors
    #[error("Embedding error: {message}")]
    Embedding {
        /// Detailed error message
        message: String,
    },
}

impl RagkitError {
    /// Create a missing environment variable error.
    pub fn missing_env_var<S: Into<String>>(name: S) -> Self {
        Self::MissingEnvVar { name: name.into() }
    }

    /// Create a new configuration error with a message.
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new authentication error with a message.
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a new model loading error with a message.
    pub fn model_loading<S: Into<String>>(message: S) -> Self {
        Self::ModelLoading {
            message: message.into(),
        }
    }

    /// Create a new LLM error with a message.
    pub fn llm<S: Into<String>>(message: S) -> Self {
        Self::Llm {
            message: message.into(),
        }
    }

    /// Create a new embedding error with a message.
    pub fn embedding<S: Into<String>>(message: S) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    /// Check if this error comes from configuration rather than a backend.
    ///
    /// Returns `true` for errors that are raised before any network call
    /// is attempted.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::MissingEnvVar { .. } | Self::Configuration { .. })
    }

    /// Check if this error is a client error (4xx-style).
    ///
    /// Returns `true` for errors caused by invalid input, configuration, or
    /// credentials that won't be fixed by retrying.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingEnvVar { .. } | Self::Configuration { .. } | Self::Authentication { .. }
        )
    }
}

/// Result type alias for convenience.
pub type Result<T> = std::result::Result<T, RagkitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_var_message() {
        let err = RagkitError::missing_env_var("AZURE_OPENAI_ENDPOINT");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing environment variable AZURE_OPENAI_ENDPOINT"
        );
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_error_client_error() {
        assert!(RagkitError::configuration("bad").is_client_error());
        assert!(RagkitError::authentication("no token").is_client_error());
        assert!(!RagkitError::model_loading("404").is_client_error());
        assert!(!RagkitError::llm("500").is_client_error());
    }

    #[test]
    fn test_authentication_is_not_configuration() {
        let err = RagkitError::authentication("HUGGINGFACE_TOKEN is not set");
        assert!(!err.is_configuration_error());
        assert!(matches!(err, RagkitError::Authentication { .. }));
    }
}
