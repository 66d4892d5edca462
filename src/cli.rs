//! Command-line interface for vdraft
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Voice-driven document drafting from the terminal
#[derive(Parser, Debug)]
#[command(
    name = "vdraft",
    version,
    about = "Voice-driven document drafting from the terminal"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend server base URL override
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Suppress status output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List draftable document topics from the catalog
    Topics,

    /// Open the drafting form for a document topic
    Draft {
        /// Topic name as listed by `vdraft topics`
        topic: String,

        /// Audio input device (e.g., pipewire)
        #[arg(long, value_name = "DEVICE")]
        device: Option<String>,
    },

    /// List available audio input devices
    Devices,
}
