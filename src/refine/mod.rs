//! Iterative idea refinement.
//!
//! A run threads a rolling "current idea" through a fixed number of rounds.
//! Each round asks the provider for three options, asks it again to pick the
//! best one, and carries the winner into the next round. The original topic
//! is repeated in every later prompt so the ideas cannot drift off-goal.
//!
//! ```text
//! topic ─▶ [generate ─▶ select ─▶ pause] × N ─▶ final idea
//! ```
//!
//! Progress is observable while the run executes via [`RefineObserver`], and
//! the full [`ThoughtLog`] is returned with the result (or with the error).

mod error;
pub mod prompts;
mod thought;

pub use error::{RefineError, Stage, USER_FACING_ERROR};
pub use thought::{RefineEvent, RefineObserver, ThoughtEntry, ThoughtLog};

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::Instrument;

use crate::ai::{ChatMessage, CompletionProvider, ProviderError};
use crate::core::{Config, Topic};

/// Default number of generate/select rounds.
pub const DEFAULT_ROUNDS: usize = 10;

/// Default pacing delay between rounds.
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(5);

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Settings for a refinement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefineConfig {
    /// Number of rounds (at least one)
    pub rounds: usize,
    /// Delay between rounds; none after the last
    pub pause: Duration,
    /// Model passed to the provider
    pub model: String,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self { rounds: DEFAULT_ROUNDS, pause: DEFAULT_PAUSE, model: DEFAULT_MODEL.to_string() }
    }
}

impl RefineConfig {
    /// Build from loaded application config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            rounds: config.refine.rounds,
            pause: config.refine.pause(),
            model: config.ai.model.clone(),
        }
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn validate(&self) -> Result<(), RefineError> {
        if self.rounds == 0 {
            return Err(RefineError::InvalidConfig("rounds must be at least 1".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(RefineError::InvalidConfig("model must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Successful outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Refinement {
    pub topic: Topic,
    pub final_idea: String,
    #[serde(rename = "thoughts")]
    pub log: ThoughtLog,
}

/// Runs the generate/select loop against a completion provider.
pub struct RefinementWorkflow<P> {
    provider: P,
    config: RefineConfig,
    observers: Vec<Arc<dyn RefineObserver>>,
}

impl<P: CompletionProvider> RefinementWorkflow<P> {
    /// Create a workflow with default settings.
    pub fn new(provider: P) -> Self {
        Self { provider, config: RefineConfig::default(), observers: Vec::new() }
    }

    /// Replace the run settings.
    pub fn with_config(mut self, config: RefineConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach an observer that receives every event of every run.
    pub fn with_observer(mut self, observer: Arc<dyn RefineObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Validate `raw` and run. Empty topics fail before any provider call.
    pub async fn refine(&self, raw: &str) -> Result<Refinement, RefineError> {
        let topic = Topic::new(raw)?;
        self.run(&topic).await
    }

    /// Run all rounds for `topic`.
    pub async fn run(&self, topic: &Topic) -> Result<Refinement, RefineError> {
        self.run_with_observer(topic, &|_: &RefineEvent| {}).await
    }

    /// Run all rounds, additionally reporting to `observer` for this run only.
    pub async fn run_with_observer(
        &self,
        topic: &Topic,
        observer: &dyn RefineObserver,
    ) -> Result<Refinement, RefineError> {
        self.config.validate()?;

        let span = tracing::info_span!(
            "refine",
            run_id = %uuid::Uuid::new_v4(),
            provider = self.provider.name(),
            rounds = self.config.rounds,
        );

        self.execute(topic, observer).instrument(span).await
    }

    async fn execute(
        &self,
        topic: &Topic,
        observer: &dyn RefineObserver,
    ) -> Result<Refinement, RefineError> {
        let goal = topic.as_str();
        let mut current_idea = goal.to_string();
        let mut log = ThoughtLog::new();

        tracing::info!("Starting refinement");

        for iteration in 0..self.config.rounds {
            self.emit(
                observer,
                &RefineEvent::RoundStarted { iteration, current_idea: current_idea.clone() },
            );

            tracing::debug!(iteration, stage = %Stage::Generation, "Requesting options");
            let messages = prompts::generation_messages(goal, &current_idea, iteration);
            let options = self
                .complete(&messages)
                .await
                .map_err(|source| failure(iteration, Stage::Generation, std::mem::take(&mut log), source))?;
            self.record(observer, &mut log, ThoughtEntry::Options { iteration, text: options.clone() });

            tracing::debug!(iteration, stage = %Stage::Selection, "Selecting best idea");
            let messages = prompts::selection_messages(goal, &options);
            let best_idea = self
                .complete(&messages)
                .await
                .map_err(|source| failure(iteration, Stage::Selection, std::mem::take(&mut log), source))?;
            self.record(observer, &mut log, ThoughtEntry::Selection { iteration, text: best_idea.clone() });

            current_idea = best_idea;

            let is_last = iteration + 1 == self.config.rounds;
            if !is_last && !self.config.pause.is_zero() {
                self.emit(observer, &RefineEvent::Pausing { iteration, duration: self.config.pause });
                tokio::time::sleep(self.config.pause).await;
            }
        }

        tracing::info!(entries = log.len(), "Refinement complete");
        self.emit(observer, &RefineEvent::Finished { final_idea: current_idea.clone() });

        Ok(Refinement { topic: topic.clone(), final_idea: current_idea, log })
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let completion = self.provider.complete(&self.config.model, messages).await?;
        if completion.content.is_none() {
            tracing::debug!("Provider returned no content; using empty string");
        }
        Ok(completion.into_text())
    }

    fn record(&self, observer: &dyn RefineObserver, log: &mut ThoughtLog, entry: ThoughtEntry) {
        log.push(entry.clone());
        self.emit(observer, &RefineEvent::Thought(entry));
    }

    fn emit(&self, observer: &dyn RefineObserver, event: &RefineEvent) {
        observer.on_event(event);
        for registered in &self.observers {
            registered.on_event(event);
        }
    }
}

fn failure(iteration: usize, stage: Stage, log: ThoughtLog, source: ProviderError) -> RefineError {
    // Cause stays at debug level; users only ever see the generic message.
    tracing::debug!(iteration, stage = %stage, error = %source, "Completion provider failed, aborting run");
    RefineError::Provider { iteration, stage, log, source }
}
