//! Agent module — the conversation companion core.
//!
//! This module contains:
//! - Turn types for the bounded transcript
//! - Closed label vocabularies (emotions, expressions)
//! - The companion itself: request building, reply extraction and repair
//! - LLM client trait and the Gemini implementation

mod companion;
mod labels;
mod message;

// LLM providers in submodule
pub mod llm;

// Re-exports for convenience
pub use companion::{Companion, Reply};
pub use labels::{Emotion, Expression};
pub use llm::{GeminiClient, LlmClient};
pub use message::{Role, Turn};
