//! LLM boundary modules.
//!
//! This module hosts the text-generator seam and the instruction templates
//! sent across it.

pub mod client;
pub mod prompts;

pub use client::{GeneratorConfig, OllamaClient, TextGenerator};

use thiserror::Error;

/// Transport-level failure of one generative call.
///
/// These never cross the pipeline boundary: each call site converts the
/// failure into its typed fallback value (sentinel record, empty theme
/// list, absent memo).
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("cannot connect to Ollama at {url}")]
    Connect { url: String },

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Ollama API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode Ollama response: {0}")]
    Decode(String),

    #[error("failed to send request: {0}")]
    Request(String),
}
