//! Changelog aggregation

use shiplog_github::{PullRequest, STATE_MERGED};
use tracing::{debug, instrument, warn};

use crate::blocks::parse_change_blocks;
use crate::entry::ValidatedChange;
use crate::parser::parse_change_entries;
use crate::validator::Validator;

/// Run extraction, parsing and validation across all pull requests of one
/// logical group (a milestone, or an accumulated branch span).
///
/// Output is flat and order-preserving: pull-request input order, then
/// sub-document order within each pull request. No reordering, no
/// deduplication. A pull request without a single `changes` fence
/// contributes nothing.
///
/// Precondition: `pulls` is already filtered to merged records by the
/// caller. A record that is not merged is logged and processed anyway,
/// never re-filtered here.
#[instrument(skip(pulls, validator), fields(pull_count = pulls.len()))]
pub fn collect_changelog(pulls: &[PullRequest], validator: &dyn Validator) -> Vec<ValidatedChange> {
    let mut changes = Vec::new();

    for pr in pulls {
        if pr.state != STATE_MERGED {
            warn!(url = %pr.url, state = %pr.state, "pull request is not merged");
        }

        let blocks = parse_change_blocks(&pr.body);
        let entries = parse_change_entries(pr, &blocks);
        changes.extend(entries.into_iter().map(|e| validator.validate(e)));
    }

    debug!(change_count = changes.len(), "changelog collected");
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::NoopValidator;
    use shiplog_github::Milestone;

    fn pull(url: &str, number: u64, body: &str) -> PullRequest {
        PullRequest::new(url, number, Milestone::new("v1.40.0", 2))
            .with_title("irrelevant")
            .with_body(body)
    }

    #[test]
    fn preserves_pull_then_document_order() {
        let pulls = vec![
            pull(
                "https://x/1",
                1,
                "```changes\nsection: a\ntype: fix\nsummary: a1\n---\nsection: b\ntype: fix\nsummary: a2\n```",
            ),
            pull("https://x/2", 2, "no changelog here"),
            pull(
                "https://x/3",
                3,
                "```changes\nsection: c\ntype: feature\nsummary: b1\n```",
            ),
        ];

        let changes = collect_changelog(&pulls, &NoopValidator);

        let summaries: Vec<&str> = changes.iter().map(|c| c.entry.summary.as_str()).collect();
        assert_eq!(summaries, vec!["a1", "a2", "b1"]);

        let urls: Vec<&str> = changes
            .iter()
            .map(|c| c.entry.pull_request.as_str())
            .collect();
        assert_eq!(urls, vec!["https://x/1", "https://x/1", "https://x/3"]);
    }

    #[test]
    fn pull_without_blocks_contributes_nothing() {
        let pulls = vec![pull("https://x/9", 9, "plain body, no fences")];
        assert!(collect_changelog(&pulls, &NoopValidator).is_empty());
    }

    #[test]
    fn empty_fence_contributes_one_malformed_entry() {
        let pulls = vec![pull("https://x/9", 9, "```changes\n```")];
        let changes = collect_changelog(&pulls, &NoopValidator);
        assert_eq!(changes.len(), 1);
        assert!(!changes[0].is_valid());
    }

    #[test]
    fn non_merged_records_are_still_aggregated() {
        let pulls = vec![pull(
            "https://x/5",
            5,
            "```changes\nsection: mod\ntype: fix\nsummary: s\n```",
        )
        .with_state("OPEN")];

        let changes = collect_changelog(&pulls, &NoopValidator);
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn entry_count_is_sum_of_per_pull_counts() {
        let pulls = vec![
            pull("https://x/1", 1, "```changes\nsection: a\ntype: fix\nsummary: one\n```"),
            pull(
                "https://x/2",
                2,
                "```changes\nsection: a, b\ntype: fix\nsummary: two\n```",
            ),
        ];

        let changes = collect_changelog(&pulls, &NoopValidator);
        assert_eq!(changes.len(), 3);
    }
}
