//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Interactive task timer.
///
/// Tracks time per task with pause/resume, and summarizes sessions into
/// categories using the Gemini API (with a local fallback when the API is
/// unavailable). State lives in memory for the lifetime of the process.
#[derive(Debug, Parser)]
#[command(name = "tempo", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip the Gemini API and always use the local classifier.
    #[arg(long)]
    pub no_classifier: bool,
}
