//! Capability traits implemented by the clients the factories return.

pub mod chat;
pub mod embedder;

pub use chat::ChatModel;
pub use embedder::Embedder;
