//! Refinement error types.

use std::fmt;

use crate::ai::ProviderError;
use crate::core::InputError;

use super::ThoughtLog;

/// Message shown to end users whenever a run fails at the provider.
pub const USER_FACING_ERROR: &str =
    "An error occurred while generating the idea. Please try again.";

/// Which provider call of a round failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generation,
    Selection,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generation => write!(f, "generation"),
            Self::Selection => write!(f, "selection"),
        }
    }
}

/// Refinement error types.
#[derive(Debug, thiserror::Error)]
pub enum RefineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("invalid refinement settings: {0}")]
    InvalidConfig(String),

    /// Displays the generic user message; the cause is reachable via `source()`.
    #[error("{}", USER_FACING_ERROR)]
    Provider {
        iteration: usize,
        stage: Stage,
        log: ThoughtLog,
        #[source]
        source: ProviderError,
    },
}

impl RefineError {
    /// Thought log recorded before a provider failure.
    pub fn partial_log(&self) -> Option<&ThoughtLog> {
        match self {
            Self::Provider { log, .. } => Some(log),
            _ => None,
        }
    }

    /// Message suitable for end users.
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider { .. } => USER_FACING_ERROR.to_string(),
            other => other.to_string(),
        }
    }
}
