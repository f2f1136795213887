//! Thought log and progress events.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

/// One append-only record of a round's intermediate output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThoughtEntry {
    /// Raw output of the generation call
    Options { iteration: usize, text: String },
    /// Output of the selection call
    Selection { iteration: usize, text: String },
}

impl ThoughtEntry {
    /// Zero-based round this entry belongs to.
    pub fn iteration(&self) -> usize {
        match self {
            Self::Options { iteration, .. } | Self::Selection { iteration, .. } => *iteration,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Options { text, .. } | Self::Selection { text, .. } => text,
        }
    }

    pub fn is_selection(&self) -> bool {
        matches!(self, Self::Selection { .. })
    }

    /// Human-readable line as shown in the thought-process panel.
    pub fn display_line(&self) -> String {
        match self {
            Self::Options { text, .. } => format!("Generated options:\n{text}"),
            Self::Selection { text, .. } => format!("Selected best idea:\n{text}"),
        }
    }
}

/// Ordered thought log of a single run. Entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ThoughtLog {
    entries: Vec<ThoughtEntry>,
}

impl ThoughtLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: ThoughtEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ThoughtEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ThoughtEntry> {
        self.entries.last()
    }

    /// Selected ideas in round order.
    pub fn selections(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter(|e| e.is_selection()).map(ThoughtEntry::text)
    }
}

impl IntoIterator for ThoughtLog {
    type Item = ThoughtEntry;
    type IntoIter = std::vec::IntoIter<ThoughtEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Progress emitted while a refinement run executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefineEvent {
    /// A round is about to generate options for `current_idea`
    RoundStarted { iteration: usize, current_idea: String },
    /// A log entry was just appended
    Thought(ThoughtEntry),
    /// Pacing delay before the next round
    Pausing { iteration: usize, duration: Duration },
    /// The run completed
    Finished { final_idea: String },
}

impl RefineEvent {
    /// Lines appended to the live thought-process panel for this event.
    pub fn display_lines(&self) -> Vec<String> {
        match self {
            Self::RoundStarted { iteration, current_idea } => vec![format!(
                "**Iteration {}:** Generating options for topic: \"{}\"",
                iteration + 1,
                current_idea
            )],
            Self::Thought(entry @ ThoughtEntry::Options { iteration, .. }) => vec![
                entry.display_line(),
                format!(
                    "**Iteration {}:** Selecting the best idea from the generated options.",
                    iteration + 1
                ),
            ],
            Self::Thought(entry) => vec![entry.display_line()],
            Self::Pausing { .. } | Self::Finished { .. } => Vec::new(),
        }
    }
}

/// Receives progress while a run executes.
pub trait RefineObserver: Send + Sync {
    fn on_event(&self, event: &RefineEvent);
}

impl RefineObserver for UnboundedSender<RefineEvent> {
    fn on_event(&self, event: &RefineEvent) {
        // Receiver gone means nobody is watching; the run carries on.
        let _ = self.send(event.clone());
    }
}

impl<F> RefineObserver for F
where
    F: Fn(&RefineEvent) + Send + Sync,
{
    fn on_event(&self, event: &RefineEvent) {
        self(event);
    }
}
