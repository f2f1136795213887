//! # Oscillate
//!
//! Oscillating creativity machine - iteratively refine a topic into its best idea.
//!
//! Oscillate asks a chat-completion model for three ideas about a topic, asks
//! it again to pick the best one, and feeds the winner back in for another
//! round. After ten rounds the surviving idea is the result. Every
//! intermediate step is recorded in a thought log and streamed as it happens.
//!
//! ## Features
//!
//! - **Refinement loop**: generate, select, pause, anchored to the original goal
//! - **Live progress**: observers and channels receive each step as it lands
//! - **Pluggable providers**: OpenAI-compatible endpoints (or a proxy) and Ollama
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! oscillate run "eco-friendly packaging"
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::items_after_statements)]

pub mod ai;
pub mod app;
pub mod core;
pub mod refine;

pub use ai::{ChatMessage, Completion, CompletionProvider, ProviderError, ProviderKind, Role};
#[cfg(feature = "ai")]
pub use ai::{OllamaProvider, OpenAIProvider};
pub use app::{App, AppState, Submission};
pub use core::{Config, InputError, Topic};
pub use refine::{
    RefineConfig, RefineError, RefineEvent, RefineObserver, Refinement, RefinementWorkflow,
    ThoughtEntry, ThoughtLog,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "oscillate";
