//! Thera - Terminal AI therapist companion
//!
//! This library provides the conversation core: a bounded transcript,
//! structured reply extraction with repair, and a swappable LLM boundary.

pub mod agent;
pub mod config;
pub mod error;
pub mod ui;

pub use error::{Error, Result};
