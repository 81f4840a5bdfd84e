//! Changelog command

use anyhow::Context;
use clap::Args;
use console::style;
use tracing::info;

use shiplog_changelog::{collect_release_changes, section_policy_validator};
use shiplog_core::config::load_config_or_default;
use shiplog_github::{GitHubClient, GitHubError};

use crate::cli::{parse_list, Cli, OutputFormat};

/// Collect and render the changelog for a milestone
#[derive(Debug, Args)]
pub struct ChangelogCommand {
    /// Milestone title, e.g. "v1.40.2"
    #[arg(short, long)]
    pub milestone: String,

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

    /// Write rendered documents (default: print the release Markdown)
    #[arg(short, long)]
    pub write: bool,

    /// Output directory (defaults to the configured changelog dir)
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,
}

impl ChangelogCommand {
    /// Execute the changelog command
    pub async fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(milestone = %self.milestone, write = self.write, "executing changelog command");
        let cwd = std::env::current_dir()?;
        let (config, _) = load_config_or_default(&cwd);

        let repo = self
            .repo
            .clone()
            .or(config.repo)
            .context("no repository configured (pass --repo or set it in shiplog.toml)")?;
        let token = self.token.clone().ok_or(GitHubError::MissingToken)?;

        let definitions = match &self.allowed_sections {
            Some(value) => parse_list(value),
            None => config.allowed_sections.clone(),
        };
        let validator = section_policy_validator(&definitions)?;

        let client = GitHubClient::new(repo, token);
        let outputs =
            collect_release_changes(&client, &self.milestone, validator.as_ref()).await?;

        if self.write {
            let output_dir = self
                .output
                .clone()
                .unwrap_or_else(|| cwd.join(&config.changelog.dir));
            std::fs::create_dir_all(&output_dir)?;

            let release_yaml = output_dir.join(format!("release-{}.yml", self.milestone));
            let release_md = output_dir.join(format!("release-{}.md", self.milestone));
            let branch_md = output_dir.join(format!("CHANGELOG-{}.md", outputs.minor_version));

            std::fs::write(&release_yaml, &outputs.release_yaml)?;
            std::fs::write(&release_md, &outputs.release_markdown)?;
            std::fs::write(&branch_md, &outputs.branch_markdown)?;

            if !cli.quiet {
                println!(
                    "{} Changelog written to {}",
                    style("✓").green().bold(),
                    style(output_dir.display()).cyan()
                );
            }
        } else {
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&outputs)?);
                }
                OutputFormat::Text => {
                    println!("{}", outputs.release_markdown);
                }
            }
        }

        Ok(())
    }
}
