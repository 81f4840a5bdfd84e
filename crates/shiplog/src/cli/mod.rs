//! CLI definition and command handling

pub mod commands;

use clap::{Parser, Subcommand};

use commands::{ChangelogCommand, CheckCommand};

/// Shiplog - changelog collection for release milestones
#[derive(Debug, Parser)]
#[command(name = "shiplog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Collect and render the changelog for a milestone
    Changelog(ChangelogCommand),

    /// Check the changelog entries of a single pull request
    Check(CheckCommand),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> anyhow::Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Changelog(ref cmd) => cmd.execute(&self).await,
            Commands::Check(ref cmd) => cmd.execute(&self).await,
        }
    }
}

/// Split a list argument on commas, whitespace and newlines.
///
/// Section-policy definitions arrive as one free-form string from the
/// command line or a workflow input; all separator styles are accepted.
pub fn parse_list(s: &str) -> Vec<String> {
    s.split([',', '\n', '\r', '\t', ' '])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}
