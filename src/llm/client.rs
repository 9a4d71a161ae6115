//! Ollama chat client.
//!
//! The pipeline talks to the generative service through the narrow
//! [`TextGenerator`] trait: one single-turn instruction in, one text blob
//! out. Tests substitute a deterministic stub; production uses
//! [`OllamaClient`] against the non-streaming `/api/chat` endpoint.

use crate::llm::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Connection settings for the generative service.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub ollama_url: String,
    pub model_name: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            model_name: "llama3".to_string(),
            temperature: 0.1,
            timeout_seconds: 300,
        }
    }
}

/// The text-generation seam of the pipeline.
///
/// The core owns no knowledge of model identity or transport details; it
/// sends an instruction and receives a reply, or a transport error.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, instruction: &str) -> Result<String, LlmError>;
}

/// Message in the chat exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Ollama chat API request.
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Ollama chat API response.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ResponseMessage,
    #[allow(dead_code)] // Response field, used for future stream handling
    done: bool,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[allow(dead_code)] // Response field
    role: String,
    content: String,
}

/// Reqwest-backed Ollama client.
pub struct OllamaClient {
    config: GeneratorConfig,
    http_client: reqwest::Client,
}

impl OllamaClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: GeneratorConfig) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| LlmError::Request(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Name of the model this client calls.
    #[allow(dead_code)] // Accessor exercised in tests
    pub fn model_name(&self) -> &str {
        &self.config.model_name
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, instruction: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.config.ollama_url);

        let request = OllamaChatRequest {
            model: self.config.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: instruction.to_string(),
            }],
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
            },
        };

        debug!("Sending chat request ({} chars)", instruction.len());

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        seconds: self.config.timeout_seconds,
                    }
                } else if e.is_connect() {
                    LlmError::Connect {
                        url: self.config.ollama_url.clone(),
                    }
                } else {
                    LlmError::Request(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;

        Ok(chat_response.message.content)
    }
}
