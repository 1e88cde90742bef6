//! Error types for Thera
//!
//! These cover the config, CLI, and transport layers. The companion's
//! `respond` operation never returns them — every failure it can meet is
//! absorbed into a fallback reply (see `agent::companion`).

use thiserror::Error;

/// Result type alias for Thera operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Thera
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
