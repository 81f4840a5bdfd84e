//! Check command

use anyhow::Context;
use clap::Args;
use console::style;
use tracing::info;

use shiplog_changelog::{check_pull, section_policy_validator};
use shiplog_core::config::load_config_or_default;
use shiplog_github::{GitHubClient, GitHubError, Milestone, PullRequest};

use crate::cli::{parse_list, Cli};
use crate::exit_codes;

/// Check the changelog entries of a single pull request
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Pull request number to fetch and check
    #[arg(long, conflicts_with = "file")]
    pub pr: Option<u64>,

    /// Read the pull request body from a file instead of the API
    #[arg(long)]
    pub file: Option<std::path::PathBuf>,

    /// Repository in "owner/name" form (defaults to the configured repo)
    #[arg(long)]
    pub repo: Option<String>,

    /// GitHub API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Section-policy definitions, comma/whitespace separated
    /// (defaults to the configured allowed_sections)
    #[arg(long)]
    pub allowed_sections: Option<String>,
}

impl CheckCommand {
    /// Execute the check command
    pub async fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(pr = ?self.pr, file = ?self.file, "executing check command");
        let cwd = std::env::current_dir()?;
        let (config, _) = load_config_or_default(&cwd);

        let definitions = match &self.allowed_sections {
            Some(value) => parse_list(value),
            None => config.allowed_sections.clone(),
        };
        let validator = section_policy_validator(&definitions)?;

        let pull = match (&self.file, self.pr) {
            (Some(path), _) => {
                let body = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                PullRequest::new(path.display().to_string(), 0, Milestone::new("", 0))
                    .with_body(body)
            }
            (None, Some(number)) => {
                let repo = self
                    .repo
                    .clone()
                    .or(config.repo)
                    .context("no repository configured (pass --repo or set it in shiplog.toml)")?;
                let token = self.token.clone().ok_or(GitHubError::MissingToken)?;
                GitHubClient::new(repo, token).pull(number).await?
            }
            (None, None) => anyhow::bail!("pass --pr <number> or --file <path>"),
        };

        let report = check_pull(&pull, validator.as_ref());

        if report.is_ok() {
            if !cli.quiet {
                println!("{} All changelog entries are valid", style("✓").green().bold());
            }
            return Ok(());
        }

        eprintln!("{} Invalid changes found:", style("✗").red().bold());
        for failure in &report.failures {
            eprintln!("  {}", failure);
        }
        std::process::exit(exit_codes::VALIDATION_ERROR);
    }
}
