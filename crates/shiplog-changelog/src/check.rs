//! Single pull-request check mode
//!
//! Validates the changelog entries of one pull request without rendering
//! anything, so authors get feedback while the PR is still open.

use shiplog_github::PullRequest;
use tracing::{debug, instrument};

use crate::blocks::parse_change_blocks;
use crate::parser::parse_change_entries;
use crate::validator::Validator;

/// Outcome of checking one pull request
#[derive(Debug)]
pub struct CheckReport {
    /// One message per invalid entry: `PR #<n>: <comma-joined errors>`
    pub failures: Vec<String>,
}

impl CheckReport {
    /// True when every entry passed validation
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Check the changelog entries of one pull request.
///
/// A pull request without any `changes` fence passes: having no changelog
/// is legitimate, having a broken one is not.
#[instrument(skip(pr, validator), fields(number = pr.number))]
pub fn check_pull(pr: &PullRequest, validator: &dyn Validator) -> CheckReport {
    let blocks = parse_change_blocks(&pr.body);
    debug!(block_count = blocks.len(), "extracted changes blocks");

    let entries = parse_change_entries(pr, &blocks);
    debug!(entry_count = entries.len(), "parsed change entries");

    let failures = entries
        .into_iter()
        .map(|entry| validator.validate(entry))
        .filter(|validated| !validated.is_valid())
        .map(|validated| {
            format!(
                "PR #{}: {}",
                validated.entry.pull_number(),
                validated.errors().join(", ")
            )
        })
        .collect();

    CheckReport { failures }
}
