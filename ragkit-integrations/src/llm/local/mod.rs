//! In-process chat generation with Candle.

pub mod client;
pub mod model;
pub mod pipeline;
pub mod prompt;

pub use client::LocalChatModel;
pub use model::CausalModel;
pub use pipeline::{FinishReason, Generation, TextGenerationPipeline};
pub use prompt::render_prompt;
