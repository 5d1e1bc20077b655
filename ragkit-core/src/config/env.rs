//! Environment lookup used by the client factories.
//!
//! Factories never read `std::env` directly. They go through an
//! [`EnvSource`], which is read at call time so that a variable set after
//! start-up is still honored, and which can be swapped for an in-memory map
//! in tests or in applications that keep secrets elsewhere.

use std::collections::HashMap;
use std::sync::Once;

use tracing::debug;

use crate::{RagkitError, Result};

/// Names of the environment variables read by the factories.
pub mod vars {
    /// Azure OpenAI resource endpoint, shared by chat and embeddings.
    pub const AZURE_OPENAI_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
    /// Azure OpenAI API key, shared by chat and embeddings.
    pub const AZURE_OPENAI_API_KEY: &str = "AZURE_OPENAI_API_KEY";
    /// Deployment name of the chat model.
    pub const AZURE_OPENAI_CHAT_DEPLOYMENT_NAME: &str = "AZURE_OPENAI_CHAT_DEPLOYMENT_NAME";
    /// API version used for chat completions.
    pub const AZURE_OPENAI_CHAT_API_VERSION: &str = "AZURE_OPENAI_CHAT_API_VERSION";
    /// Deployment name of the embedding model.
    pub const AZURE_OPENAI_EMBEDDING_DEPLOYMENT_NAME: &str =
        "AZURE_OPENAI_EMBEDDING_DEPLOYMENT_NAME";
    /// API version used for embeddings.
    pub const AZURE_OPENAI_EMBEDDING_API_VERSION: &str = "AZURE_OPENAI_EMBEDDING_API_VERSION";
    /// Hugging Face Hub access token.
    pub const HUGGINGFACE_TOKEN: &str = "HUGGINGFACE_TOKEN";
    /// Groq API key.
    pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
    /// Optional override for the Ollama daemon URL.
    pub const OLLAMA_BASE_URL: &str = "OLLAMA_BASE_URL";
}

/// A source of configuration values keyed by environment variable name.
pub trait EnvSource: Send + Sync + std::fmt::Debug {
    /// Look up a variable. Returns `None` when it is not set.
    fn get(&self, name: &str) -> Option<String>;

    /// Look up a variable, treating an empty value as unset.
    fn get_non_empty(&self, name: &str) -> Option<String> {
        self.get(name).filter(|value| !value.trim().is_empty())
    }

    /// Look up a required variable.
    ///
    /// # Errors
    ///
    /// Returns [`RagkitError::MissingEnvVar`] when the variable is absent or
    /// empty.
    fn require(&self, name: &str) -> Result<String> {
        self.get_non_empty(name)
            .ok_or_else(|| RagkitError::missing_env_var(name))
    }
}

/// Reads the process environment at lookup time.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

static DOTENV: Once = Once::new();

impl ProcessEnv {
    /// Create a process environment source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Create a process environment source after loading `.env`, if present.
    ///
    /// Variables already set in the process take precedence over the file.
    /// The file is loaded at most once per process.
    #[must_use]
    pub fn with_dotenv() -> Self {
        DOTENV.call_once(|| match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => debug!("Ignoring unreadable .env file: {e}"),
        });
        Self
    }
}

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory environment, used in tests and by applications that resolve
/// secrets themselves.
///
/// # Examples
///
/// ```rust
/// use ragkit_core::config::{EnvSource, MapEnv};
///
/// let env = MapEnv::new().with("GROQ_API_KEY", "gsk-test");
/// assert_eq!(env.get("GROQ_API_KEY").as_deref(), Some("gsk-test"));
/// assert!(env.require("HUGGINGFACE_TOKEN").is_err());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MapEnv {
    values: HashMap<String, String>,
}

impl MapEnv {
    /// Create an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable.
    #[must_use]
    pub fn with<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Remove a variable.
    #[must_use]
    pub fn without(mut self, name: &str) -> Self {
        self.values.remove(name);
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_reports_variable_name() {
        let env = MapEnv::new();
        let err = env.require(vars::GROQ_API_KEY).unwrap_err();
        assert!(matches!(
            err,
            RagkitError::MissingEnvVar { ref name } if name == "GROQ_API_KEY"
        ));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let env = MapEnv::new().with(vars::HUGGINGFACE_TOKEN, "  ");
        assert_eq!(env.get(vars::HUGGINGFACE_TOKEN).as_deref(), Some("  "));
        assert!(env.get_non_empty(vars::HUGGINGFACE_TOKEN).is_none());
        assert!(env.require(vars::HUGGINGFACE_TOKEN).is_err());
    }

    #[test]
    fn test_from_iter_and_without() {
        let env: MapEnv = [("A", "1"), ("B", "2")].into_iter().collect();
        let env = env.without("A");
        assert!(env.get("A").is_none());
        assert_eq!(env.require("B").unwrap(), "2");
    }
}
