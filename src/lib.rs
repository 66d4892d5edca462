//! vdraft - Voice-driven document drafting from the terminal
//!
//! Pick a document topic, fill its server-defined fields by typing,
//! dictating, or rich-text editing, and preview the assembled document.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod audio;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod form;
pub mod gateway;
pub mod prompts;
pub mod richtext;

// Core traits (source → capture → transcribe)
pub use audio::recorder::AudioSource;
pub use gateway::TranscriptionGateway;
pub use richtext::{RichTextBuffer, RichTextEngine};

// The drafting form
pub use form::{DraftForm, ViewMode};

// Error handling
pub use error::{Result, VdraftError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
