//! Shared test helpers.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use oscillate::ai::{ChatMessage, Completion, CompletionProvider, ProviderError};
use oscillate::refine::prompts::{GENERATION_SYSTEM, SELECTION_SYSTEM};

type Script = dyn Fn(usize, &[ChatMessage]) -> Result<Completion, ProviderError> + Send + Sync;

/// Provider that answers from a script and records every request.
#[derive(Clone)]
pub struct ScriptedProvider {
    script: Arc<Script>,
    calls: Arc<Mutex<Vec<Recorded>>>,
}

/// A recorded provider call.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl Recorded {
    pub fn system(&self) -> &str {
        &self.messages[0].content
    }

    pub fn user(&self) -> &str {
        &self.messages[1].content
    }

    pub fn is_generation(&self) -> bool {
        self.system() == GENERATION_SYSTEM
    }

    pub fn is_selection(&self) -> bool {
        self.system() == SELECTION_SYSTEM
    }
}

impl ScriptedProvider {
    /// Script receives the zero-based call index and the messages.
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(usize, &[ChatMessage]) -> Result<Completion, ProviderError> + Send + Sync + 'static,
    {
        Self { script: Arc::new(script), calls: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Fixed answers for generation and selection calls.
    pub fn fixed(options: &'static str, selection: &'static str) -> Self {
        Self::new(move |_, messages| {
            if messages[0].content == GENERATION_SYSTEM {
                Ok(Completion::text_of(options))
            } else {
                Ok(Completion::text_of(selection))
            }
        })
    }

    /// Answers like `fixed`, but fails on the given call index.
    pub fn failing_at(fail_at: usize, options: &'static str, selection: &'static str) -> Self {
        let fixed = Self::fixed(options, selection);
        Self::new(move |index, messages| {
            if index == fail_at {
                Err(ProviderError::Transport("connection reset".to_string()))
            } else {
                (fixed.script)(index, messages)
            }
        })
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<Completion, ProviderError> {
        let index = {
            let mut calls = self.calls.lock();
            calls.push(Recorded { model: model.to_string(), messages: messages.to_vec() });
            calls.len() - 1
        };
        (self.script)(index, messages)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
