//! LLM client abstraction layer.
//!
//! This module provides:
//! - [`LlmClient`] trait for swappable LLM providers
//! - Concrete implementation: Gemini API key
//!
//! The companion treats this boundary as opaque: a request is a system
//! instruction plus the ordered transcript, a response is raw completion
//! text or an error. Endpoint, auth, and retry details live behind it.
//!
//! # Adding a New Provider
//!
//! 1. Create a new file (e.g., `openai.rs`)
//! 2. Implement `LlmClient` trait
//! 3. Wire it up in `main.rs` from config

mod types;

use async_trait::async_trait;

use crate::Result;

pub use types::*;

// Re-export concrete implementations
pub mod gemini;

pub use gemini::GeminiClient;

use super::message::Turn;

/// LLM client trait — swappable provider abstraction.
///
/// Implement this trait to add a new LLM provider.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the system instruction and transcript, get the raw completion.
    async fn generate(&self, instruction: &str, turns: &[Turn]) -> Result<String>;

    /// Model identifier used by this client.
    fn model(&self) -> &str;
}

/// Fake LLM client for testing.
#[cfg(test)]
pub struct FakeLlmClient {
    completions: std::sync::Mutex<std::collections::VecDeque<String>>,
}

#[cfg(test)]
impl FakeLlmClient {
    /// Create with predefined raw completions. Once the queue is drained,
    /// `generate` errors — which is also how tests script a transport
    /// failure (start with an empty queue).
    pub fn new(completions: Vec<&str>) -> Self {
        Self {
            completions: std::sync::Mutex::new(
                completions.iter().map(|s| s.to_string()).collect(),
            ),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl LlmClient for FakeLlmClient {
    async fn generate(&self, _instruction: &str, _turns: &[Turn]) -> Result<String> {
        let mut completions = self.completions.lock().unwrap();
        completions
            .pop_front()
            .ok_or_else(|| crate::error::Error::Llm("No more fake completions".to_string()))
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}
