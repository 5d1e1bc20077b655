//! Factory traits for creating clients from backend selections.
//!
//! Concrete factories live in `ragkit-integrations`; these traits let
//! applications accept any factory, including test doubles.

pub mod embedder;
pub mod llm;

pub use embedder::*;
pub use llm::*;
