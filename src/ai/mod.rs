//! Completion provider integration.
//!
//! The refinement workflow talks to a text-generation backend through the
//! [`CompletionProvider`] trait only. Concrete HTTP adapters live behind the
//! `ai` feature:
//!
//! - [`OpenAIProvider`] - OpenAI-compatible `/chat/completions` (or a proxy in front of it)
//! - [`OllamaProvider`] - local models served by Ollama

#[cfg(feature = "ai")]
mod ollama;
#[cfg(feature = "ai")]
mod openai;

#[cfg(feature = "ai")]
pub use ollama::OllamaProvider;
#[cfg(feature = "ai")]
pub use openai::OpenAIProvider;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// A generated completion. Providers may legitimately return no content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub content: Option<String>,
}

impl Completion {
    /// Completion carrying text.
    pub fn text_of(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()) }
    }

    /// Completion with no content.
    pub fn empty() -> Self {
        Self { content: None }
    }

    /// The generated text, or an empty string when the provider returned none.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Consume into the generated text, empty when absent.
    pub fn into_text(self) -> String {
        self.content.unwrap_or_default()
    }
}

/// Trait for chat-style completion providers.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a completion for the given role-tagged messages.
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<Completion, ProviderError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

#[async_trait]
impl<P: CompletionProvider + ?Sized> CompletionProvider for Box<P> {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<Completion, ProviderError> {
        (**self).complete(model, messages).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<P: CompletionProvider + ?Sized> CompletionProvider for std::sync::Arc<P> {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<Completion, ProviderError> {
        (**self).complete(model, messages).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Provider error types. None of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API key not set: {0}")]
    MissingApiKey(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Rate limited, retry after {0:?}s")]
    RateLimited(Option<u64>),

    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Selectable provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Ollama,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAI => write!(f, "openai"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            other => Err(format!("unknown provider '{other}' (expected openai or ollama)")),
        }
    }
}

/// Build the provider selected in configuration.
#[cfg(feature = "ai")]
pub fn build_provider(
    config: &crate::core::AiConfig,
) -> Result<Box<dyn CompletionProvider>, ProviderError> {
    match config.provider {
        ProviderKind::OpenAI => {
            let mut provider = match config.api_key.as_deref() {
                Some(key) if !key.trim().is_empty() => OpenAIProvider::with_api_key(key),
                _ => OpenAIProvider::new()?,
            };
            if let Some(url) = &config.base_url {
                provider = provider.with_base_url(url.clone());
            }
            Ok(Box::new(provider))
        }
        ProviderKind::Ollama => {
            let mut provider = OllamaProvider::new();
            if let Some(url) = &config.base_url {
                provider = provider.with_base_url(url.clone());
            }
            Ok(Box::new(provider))
        }
    }
}
