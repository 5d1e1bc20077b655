//! Chat completion trait.

use async_trait::async_trait;

use crate::{
    Result,
    types::{ChatMessage, ChatResponse, ClientSettings},
};

/// A chat-capable model client.
///
/// Clients are built fully configured by a factory and are safe to share
/// across tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use ragkit_core::traits::ChatModel;
/// use ragkit_core::types::{ChatMessage, ChatResponse, ClientSettings};
/// use ragkit_core::Result;
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct Echo {
///     settings: ClientSettings,
/// }
///
/// #[async_trait]
/// impl ChatModel for Echo {
///     async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse> {
///         let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
///         Ok(ChatResponse::new(last, &self.settings.model))
///     }
///
///     fn settings(&self) -> &ClientSettings {
///         &self.settings
///     }
/// }
/// ```
#[async_trait]
pub trait ChatModel: Send + Sync + std::fmt::Debug {
    /// Send a conversation and return the model's reply.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse>;

    /// Send a single user prompt and return the reply text.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let response = self.chat(&[ChatMessage::user(prompt)]).await?;
        Ok(response.content)
    }

    /// Configuration this client was built with.
    fn settings(&self) -> &ClientSettings;

    /// Get a human-readable name for this client.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
