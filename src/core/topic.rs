//! The user's goal string.

use std::fmt;

use serde::Serialize;

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("topic must not be empty")]
    EmptyTopic,
}

/// A non-empty topic. Immutable once a run starts.
///
/// The text is kept exactly as entered; only the emptiness check trims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Validate a raw topic string.
    pub fn new(raw: impl Into<String>) -> Result<Self, InputError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(InputError::EmptyTopic);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Topic {
    type Error = InputError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
