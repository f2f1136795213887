//! Ollama local LLM integration.
//!
//! Implements the CompletionProvider trait for Ollama's `/api/chat` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, Completion, CompletionProvider, ProviderError};

/// Ollama API provider for local LLM.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider with default settings.
    ///
    /// Uses localhost:11434 by default.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: std::env::var("OLLAMA_HOST")
                .map(|host| host.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
        }
    }

    /// Create with a specific base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<Completion, ProviderError> {
        let request = OllamaRequest { model, messages, stream: false };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let response: OllamaResponse =
            response.json().await.map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(Completion { content: response.message.content })
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama API request structure.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

/// Ollama API response structure.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: Option<String>,
}
