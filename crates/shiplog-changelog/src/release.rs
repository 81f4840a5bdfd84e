//! Release changelog orchestration
//!
//! Ties the pipeline together for one milestone: fetch its pull requests,
//! aggregate and render the release documents, then walk the sibling
//! patch versions down to `.0` for the cumulative branch changelog.
//! Fetching is the only operation that suspends; everything downstream is
//! a pure fold over already-resolved lists.

use serde::Serialize;
use shiplog_core::error::{RenderError, VersionError};
use shiplog_github::{GitHubError, PullSource};
use thiserror::Error;
use tracing::{info, instrument};

use crate::collector::collect_changelog;
use crate::formatter::{format_branch_markdown, format_markdown, format_yaml, VersionChanges};
use crate::validator::Validator;
use crate::version::MilestoneVersion;

/// Errors from release collection
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Milestone title does not carry a version
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Fetching pull requests failed
    #[error(transparent)]
    Source(#[from] GitHubError),

    /// Rendering failed
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Rendered documents for one release milestone
#[derive(Debug, Default, Serialize)]
pub struct ReleaseOutputs {
    /// YAML changelog of the exact milestone
    pub release_yaml: String,
    /// Markdown changelog of the exact milestone
    pub release_markdown: String,
    /// Cumulative Markdown across the minor-version branch
    pub branch_markdown: String,
    /// Derived minor version, used by callers to name the output file
    pub minor_version: String,
}

/// Collect and render the changelog documents for a milestone.
///
/// The milestone title is parsed first, so a broken milestone fails
/// before any fetching. A milestone without pull requests leaves the
/// release documents empty.
#[instrument(skip(source, validator))]
pub async fn collect_release_changes(
    source: &dyn PullSource,
    milestone: &str,
    validator: &dyn Validator,
) -> Result<ReleaseOutputs, ReleaseError> {
    let version = MilestoneVersion::parse(milestone)?;

    let mut outputs = ReleaseOutputs {
        minor_version: version.to_minor(),
        ..ReleaseOutputs::default()
    };

    let pulls = source.milestone_pulls(milestone).await?;
    info!(pull_count = pulls.len(), "milestone pulls fetched");

    if !pulls.is_empty() {
        let changes = collect_changelog(&pulls, validator);
        outputs.release_yaml = format_yaml(&changes)?;
        outputs.release_markdown = format_markdown(&version, &changes);
    }

    let mut groups = Vec::new();
    for prev_version in version.down_to_zero() {
        let pulls = source.milestone_pulls(&prev_version).await?;
        let changes = collect_changelog(&pulls, validator);
        groups.push(VersionChanges {
            version: prev_version,
            changes,
        });
    }
    outputs.branch_markdown = format_branch_markdown(&version.to_minor(), &groups);

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::NoopValidator;
    use async_trait::async_trait;
    use shiplog_github::{Milestone, PullRequest};
    use std::collections::HashMap;

    struct FakeSource {
        by_milestone: HashMap<String, Vec<PullRequest>>,
    }

    #[async_trait]
    impl PullSource for FakeSource {
        async fn milestone_pulls(
            &self,
            milestone: &str,
        ) -> shiplog_github::Result<Vec<PullRequest>> {
            Ok(self.by_milestone.get(milestone).cloned().unwrap_or_default())
        }
    }

    fn pull(url: &str, number: u64, milestone: &str, body: &str) -> PullRequest {
        PullRequest::new(url, number, Milestone::new(milestone, 1)).with_body(body)
    }

    fn source() -> FakeSource {
        let mut by_milestone = HashMap::new();
        by_milestone.insert(
            "v1.40.2".to_string(),
            vec![pull(
                "https://x/13",
                13,
                "v1.40.2",
                "```changes\nsection: mod\ntype: fix\nsummary: current fix\n```",
            )],
        );
        by_milestone.insert(
            "v1.40.0".to_string(),
            vec![pull(
                "https://x/7",
                7,
                "v1.40.0",
                "```changes\nsection: mod\ntype: feature\nsummary: initial feature\n```",
            )],
        );
        FakeSource { by_milestone }
    }

    #[tokio::test]
    async fn renders_release_and_branch_documents() {
        let outputs = collect_release_changes(&source(), "v1.40.2", &NoopValidator)
            .await
            .unwrap();

        assert_eq!(outputs.minor_version, "v1.40");
        assert!(outputs.release_yaml.contains("current fix"));
        assert!(outputs.release_markdown.starts_with("# Changelog v1.40.2"));

        // Branch document covers prior patches only, newest first.
        assert!(outputs.branch_markdown.starts_with("# Changelog v1.40"));
        assert!(outputs.branch_markdown.contains("## v1.40.0"));
        assert!(outputs.branch_markdown.contains("initial feature"));
        assert!(!outputs.branch_markdown.contains("current fix"));
    }

    #[tokio::test]
    async fn empty_milestone_leaves_release_documents_empty() {
        let outputs = collect_release_changes(&source(), "v1.41.0", &NoopValidator)
            .await
            .unwrap();

        assert_eq!(outputs.release_yaml, "");
        assert_eq!(outputs.release_markdown, "");
        assert_eq!(outputs.minor_version, "v1.41");
    }

    #[tokio::test]
    async fn invalid_milestone_fails_before_fetching() {
        let err = collect_release_changes(&source(), "main", &NoopValidator)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "unexpected version \"main\"");
    }
}
