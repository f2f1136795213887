//! App State Tests
//!
//! Covers the boundary layer: input guard, re-entry guard and display slots.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use common::ScriptedProvider;
use oscillate::ai::{ChatMessage, Completion, CompletionProvider, ProviderError};
use oscillate::refine::{RefineConfig, RefinementWorkflow, USER_FACING_ERROR};
use oscillate::{App, Submission};

fn app_with(provider: ScriptedProvider, rounds: usize) -> App<ScriptedProvider> {
    App::new(
        RefinementWorkflow::new(provider)
            .with_config(RefineConfig::default().with_rounds(rounds).with_pause(Duration::ZERO)),
    )
}

#[tokio::test]
async fn test_blank_topic_is_ignored() {
    let provider = ScriptedProvider::fixed("A", "B");
    let app = app_with(provider.clone(), 10);

    assert!(matches!(app.submit("   ").await, Submission::Ignored));
    assert_eq!(provider.call_count(), 0);
    assert_eq!(app.snapshot(), oscillate::AppState::default());
}

#[tokio::test]
async fn test_successful_run_fills_slots() {
    let app = app_with(ScriptedProvider::fixed("Idea A, Idea B, Idea C", "Idea B"), 10);

    let submission = app.submit("eco-friendly packaging").await;
    assert!(matches!(submission, Submission::Completed(ref r) if r.final_idea == "Idea B"));

    let state = app.snapshot();
    assert_eq!(state.topic, "eco-friendly packaging");
    assert_eq!(state.final_idea.as_deref(), Some("Idea B"));
    assert!(state.error.is_none());
    assert!(!state.is_loading);
    assert!(!app.is_running());

    // Four display lines per round: two announcements and two entries.
    assert_eq!(state.thoughts.len(), 40);
    assert_eq!(
        state.thoughts[0],
        "**Iteration 1:** Generating options for topic: \"eco-friendly packaging\""
    );
    assert_eq!(state.thoughts[1], "Generated options:\nIdea A, Idea B, Idea C");
    assert_eq!(
        state.thoughts[2],
        "**Iteration 1:** Selecting the best idea from the generated options."
    );
    assert_eq!(state.thoughts[3], "Selected best idea:\nIdea B");
    assert_eq!(state.thoughts[4], "**Iteration 2:** Generating options for topic: \"Idea B\"");
    assert!(state.render_thoughts().contains("\n\nSelected best idea:\nIdea B"));
}

#[tokio::test]
async fn test_failure_sets_generic_error_and_keeps_thoughts() {
    let app = app_with(ScriptedProvider::failing_at(1, "A, B", "B"), 10);

    let submission = app.submit("kites").await;
    let Submission::Failed(err) = submission else {
        panic!("expected failure");
    };
    assert_eq!(err.partial_log().map(|l| l.len()), Some(1));

    let state = app.snapshot();
    assert_eq!(state.error.as_deref(), Some(USER_FACING_ERROR));
    assert!(state.final_idea.is_none());
    assert!(!state.is_loading);
    assert!(state.thoughts.iter().any(|t| t == "Generated options:\nA, B"));
    assert!(!app.is_running());
}

#[tokio::test]
async fn test_new_submit_resets_previous_error() {
    let provider = ScriptedProvider::failing_at(0, "A", "B");
    let app = app_with(provider, 1);

    assert!(matches!(app.submit("first").await, Submission::Failed(_)));
    assert!(app.snapshot().error.is_some());

    // Calls after index 0 succeed.
    assert!(matches!(app.submit("second").await, Submission::Completed(_)));
    let state = app.snapshot();
    assert!(state.error.is_none());
    assert_eq!(state.topic, "second");
    assert_eq!(state.final_idea.as_deref(), Some("B"));
}

/// Provider that blocks its first call until released.
struct GatedProvider {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl CompletionProvider for GatedProvider {
    async fn complete(
        &self,
        _model: &str,
        _messages: &[ChatMessage],
    ) -> Result<Completion, ProviderError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(Completion::text_of("done"))
    }

    fn name(&self) -> &str {
        "gated"
    }
}

#[tokio::test]
async fn test_reentry_is_rejected_while_running() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let provider = GatedProvider { entered: Arc::clone(&entered), release: Arc::clone(&release) };
    let app = Arc::new(App::new(
        RefinementWorkflow::new(provider)
            .with_config(RefineConfig::default().with_rounds(1).with_pause(Duration::ZERO)),
    ));

    let running = {
        let app = Arc::clone(&app);
        tokio::spawn(async move { app.submit("first").await })
    };

    entered.notified().await;
    assert!(app.is_running());
    assert!(app.snapshot().is_loading);
    assert!(matches!(app.submit("second").await, Submission::Busy));

    // The panel fills in while the generation call is still pending.
    assert_eq!(
        app.snapshot().thoughts,
        vec!["**Iteration 1:** Generating options for topic: \"first\"".to_string()]
    );

    // Release the generation call, then the selection call.
    release.notify_one();
    entered.notified().await;
    let thoughts = app.snapshot().thoughts;
    assert_eq!(thoughts.len(), 3);
    assert_eq!(thoughts[1], "Generated options:\ndone");
    release.notify_one();

    let first = running.await.unwrap();
    assert!(matches!(first, Submission::Completed(_)));
    assert!(!app.is_running());
    assert_eq!(app.snapshot().topic, "first");
}
