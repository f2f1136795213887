//! Core types for Oscillate.
//!
//! Configuration and the validated topic input.

mod config;
mod topic;

pub use config::{AiConfig, Config, RefineSettings, LOCAL_CONFIG_FILE};
pub use topic::{InputError, Topic};
