//! CLI interface for the job matcher

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "jobfit")]
#[command(about = "Job posting to candidate matching tool")]
#[command(
    long_about = "Score a candidate profile against a job posting using keyword matching, \
synonym expansion, optional AI-assisted judgments and embedding similarity"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a profile against a job posting and generate feedback
    Match {
        /// Stored profile name (omit to use the built-in default profile)
        #[arg(short, long)]
        profile: Option<String>,

        /// Path to the job posting file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Job posting title shown in the report
        #[arg(short, long, default_value = "")]
        title: String,

        /// OpenAI API key; falls back to the OPENAI_API_KEY environment variable
        #[arg(long)]
        api_key: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "console")]
        output: OutputFormat,

        /// Save the rendered report to a file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Skip language-model calls, keyword and template paths only
        #[arg(long)]
        no_llm: bool,

        /// Disable colored console output
        #[arg(long)]
        no_color: bool,
    },

    /// Candidate profile management
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Import a profile from a JSON file, migrating legacy fields
    Import {
        /// Path to the profile JSON file
        file: PathBuf,

        /// Store under this name instead of the profile's own name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List stored profiles
    List,

    /// Print a stored profile as JSON
    Show {
        /// Profile name
        name: String,
    },

    /// Delete a stored profile
    Delete {
        /// Profile name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Validate that a file exists and carries one of the allowed extensions.
pub fn validate_file_extension(path: &Path, allowed: &[&str]) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("file not found: {}", path.display()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if allowed.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(format!(
            "unsupported extension '{}', expected one of: {}",
            ext,
            allowed.join(", ")
        ))
    }
}
