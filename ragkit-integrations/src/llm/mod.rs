//! Chat clients.
//!
//! Concrete implementations of the [`ChatModel`](ragkit_core::ChatModel)
//! trait for each chat backend.

pub mod azure;
pub mod hosted;

#[cfg(feature = "local")]
pub mod local;

pub use azure::AzureChatClient;
pub use hosted::SiumaiChatClient;

#[cfg(feature = "local")]
pub use local::LocalChatModel;
