//! Application state for an interactive front end.
//!
//! The `App` struct holds the slots a front end renders (topic, live thought
//! process, final idea, error) and guards against starting a second run while
//! one is still in flight.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::ai::CompletionProvider;
use crate::core::Topic;
use crate::refine::{RefineError, RefineEvent, Refinement, RefinementWorkflow};

/// Renderable state, as a front end would show it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// Topic of the current or last run
    pub topic: String,

    /// Live thought-process lines, including round announcements
    pub thoughts: Vec<String>,

    /// Final idea of the last successful run
    pub final_idea: Option<String>,

    /// User-facing error of the last failed run
    pub error: Option<String>,

    /// Whether a run is in flight (the trigger is disabled)
    pub is_loading: bool,
}

impl AppState {
    /// Thought process as one block, entries separated by a blank line.
    pub fn render_thoughts(&self) -> String {
        self.thoughts.join("\n\n")
    }
}

/// Outcome of [`App::submit`].
#[derive(Debug)]
pub enum Submission {
    /// Topic was blank; nothing ran
    Ignored,
    /// Another run is still active
    Busy,
    /// Run finished
    Completed(Refinement),
    /// Run failed; the error keeps the partial log and the cause
    Failed(RefineError),
}

/// Main application state container.
pub struct App<P> {
    workflow: RefinementWorkflow<P>,
    state: Mutex<AppState>,
    running: AtomicBool,
}

/// Clears the running flag when a run ends, however it ends.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<P: CompletionProvider> App<P> {
    pub fn new(workflow: RefinementWorkflow<P>) -> Self {
        Self { workflow, state: Mutex::new(AppState::default()), running: AtomicBool::new(false) }
    }

    /// Whether a run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Copy of the current renderable state.
    pub fn snapshot(&self) -> AppState {
        self.state.lock().clone()
    }

    /// Submit a topic, running the workflow to completion or failure.
    pub async fn submit(&self, raw_topic: &str) -> Submission {
        let Ok(topic) = Topic::new(raw_topic) else {
            tracing::debug!("Ignoring blank topic");
            return Submission::Ignored;
        };

        if self.running.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err()
        {
            tracing::warn!("Refinement already running, ignoring submit");
            return Submission::Busy;
        }
        let _guard = RunningGuard(&self.running);

        {
            let mut state = self.state.lock();
            state.topic = raw_topic.to_string();
            state.thoughts.clear();
            state.final_idea = None;
            state.error = None;
            state.is_loading = true;
        }

        let observer = |event: &RefineEvent| {
            let lines = event.display_lines();
            if !lines.is_empty() {
                self.state.lock().thoughts.extend(lines);
            }
        };
        let result = self.workflow.run_with_observer(&topic, &observer).await;

        let mut state = self.state.lock();
        state.is_loading = false;
        match result {
            Ok(refinement) => {
                state.final_idea = Some(refinement.final_idea.clone());
                Submission::Completed(refinement)
            }
            Err(err) => {
                state.error = Some(err.user_message());
                Submission::Failed(err)
            }
        }
    }
}
