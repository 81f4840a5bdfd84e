//! Markdown changelog formatter
//!
//! Renders the release changelog for humans: malformed entries first so
//! authors see their own mistakes, then the digest of high-impact notes,
//! then features, fixes and chores. Low-impact entries are kept out of
//! the listings entirely.

use tracing::{debug, instrument};

use crate::entry::{ChangeType, ImpactLevel, ValidatedChange};
use crate::version::MilestoneVersion;

/// Changes of one patch release inside a branch changelog
#[derive(Debug)]
pub struct VersionChanges {
    /// Patch version title, e.g. "v1.85.2"
    pub version: String,
    /// Aggregated changes of that release
    pub changes: Vec<ValidatedChange>,
}

/// Render the Markdown changelog for one milestone.
#[instrument(skip(version, changes), fields(milestone = %version, change_count = changes.len()))]
pub fn format_markdown(version: &MilestoneVersion, changes: &[ValidatedChange]) -> String {
    let mut output = format!("# Changelog {}\n", version);

    push_sections(&mut output, changes, 2);

    let minor = version.to_minor();
    output.push('\n');
    output.push_str(&format!(
        "See [the CHANGELOG {minor}](../main/CHANGELOG/CHANGELOG-{minor}.md) for more details.\n"
    ));

    debug!(output_len = output.len(), "markdown changelog formatted");
    output
}

/// Render the cumulative Markdown changelog of a minor-version branch.
///
/// One group per prior patch release, in the order given (the caller
/// walks versions in descending order); the same sections as the release
/// changelog, demoted one heading level. Releases that render nothing
/// are omitted. There is no trailing pointer line; this document is the
/// one the pointer refers to.
#[instrument(skip(minor_version, groups), fields(minor = minor_version, group_count = groups.len()))]
pub fn format_branch_markdown(minor_version: &str, groups: &[VersionChanges]) -> String {
    let mut output = format!("# Changelog {}\n", minor_version);

    for group in groups {
        let mut body = String::new();
        push_sections(&mut body, &group.changes, 3);
        if body.is_empty() {
            continue;
        }

        output.push('\n');
        output.push_str(&format!("## {}\n", group.version));
        output.push_str(&body);
    }

    debug!(output_len = output.len(), "branch markdown formatted");
    output
}

fn push_sections(output: &mut String, changes: &[ValidatedChange], level: usize) {
    push_section(output, level, "[MALFORMED]", &collect_malformed(changes));
    push_section(output, level, "Release digest", &collect_digest(changes));
    push_section(
        output,
        level,
        "Features",
        &collect_typed(changes, ChangeType::Feature),
    );
    push_section(
        output,
        level,
        "Fixes",
        &collect_typed(changes, ChangeType::Fix),
    );
    push_section(
        output,
        level,
        "Chore",
        &collect_typed(changes, ChangeType::Chore),
    );
}

/// Append one section; a section with no items is omitted entirely
fn push_section(output: &mut String, level: usize, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    output.push('\n');
    output.push_str(&"#".repeat(level));
    output.push(' ');
    output.push_str(title);
    output.push_str("\n\n");

    for item in items {
        output.push_str("- ");
        output.push_str(item);
        output.push('\n');
    }
}

/// Entries that failed validation, keyed by PR number so authors can fix
/// their descriptions in place. GitHub expands "#123" to a PR link.
fn collect_malformed(changes: &[ValidatedChange]) -> Vec<String> {
    let mut malformed: Vec<(u64, String)> = changes
        .iter()
        .filter(|c| !c.is_valid())
        .map(|c| (c.entry.pull_number(), c.errors().join(", ")))
        .collect();

    malformed.sort_by_key(|(number, _)| *number);
    malformed
        .into_iter()
        .map(|(number, message)| format!("#{} {}", number, message))
        .collect()
}

/// Impact notes of valid high-impact entries, sorted lexicographically to
/// naively group similar wording together
fn collect_digest(changes: &[ValidatedChange]) -> Vec<String> {
    let mut notes: Vec<String> = changes
        .iter()
        .filter(|c| c.is_valid() && c.entry.impact_level == ImpactLevel::High.as_str())
        .filter_map(|c| c.entry.impact.clone())
        .filter(|impact| !impact.is_empty())
        .collect();

    notes.sort();
    notes
}

/// Valid entries of one type, low-impact noise excluded, sorted by section
fn collect_typed(changes: &[ValidatedChange], change_type: ChangeType) -> Vec<String> {
    let mut typed: Vec<&ValidatedChange> = changes
        .iter()
        .filter(|c| {
            c.is_valid()
                && c.entry.change_type.parse() == Ok(change_type)
                && c.entry.impact_level != ImpactLevel::Low.as_str()
        })
        .collect();

    typed.sort_by(|a, b| a.entry.section.cmp(&b.entry.section));
    typed.into_iter().map(|c| change_line(c)).collect()
}

fn change_line(change: &ValidatedChange) -> String {
    let entry = &change.entry;
    let line = format!(
        "**[{}]** {} [#{}]({})",
        entry.section,
        entry.summary,
        entry.pull_number(),
        entry.pull_request
    );

    match &entry.impact {
        // Continuation lines are indented so the note stays attached to
        // its list item.
        Some(impact) => format!("{}\n  {}", line, impact.replace('\n', "\n  ")),
        None => line,
    }
}
