//! Change entry parsing
//!
//! Each `changes` block is a YAML-style document stream: sub-documents
//! separated by `---` lines, each a flat mapping of scalar fields with at
//! most one `|` literal block scalar per field. Parsing is deliberately
//! conservative (failsafe): scalars are never coerced, so `42` stays the
//! string "42" and leading zeros survive.
//!
//! A sub-document that fails to parse collapses into the canonical
//! malformed entry for its pull request instead of aborting the block;
//! one bad document never suppresses its siblings.

use shiplog_github::PullRequest;
use tracing::debug;

use crate::entry::{ChangeEntry, ImpactLevel};

/// Field names recognized across both schema generations
const KEY_SECTION: &str = "section";
const KEY_MODULE: &str = "module";
const KEY_SUMMARY: &str = "summary";
const KEY_DESCRIPTION: &str = "description";
const KEY_IMPACT: &str = "impact";
const KEY_NOTE: &str = "note";
const KEY_TYPE: &str = "type";
const KEY_IMPACT_LEVEL: &str = "impact_level";

/// Parse every sub-document of every block into change entries,
/// order-preserving across blocks and within each block.
///
/// `pull_request` on each produced entry is always derived from `pr`,
/// never from parsed content.
pub fn parse_change_entries(pr: &PullRequest, blocks: &[String]) -> Vec<ChangeEntry> {
    let mut entries = Vec::new();

    for block in blocks {
        let documents = split_documents(block);

        if documents.is_empty() {
            // A changes fence with no content is itself a defect to report.
            entries.push(ChangeEntry::malformed(&pr.url));
            continue;
        }

        for document in documents {
            match parse_document(&document) {
                Ok(fields) => entries.extend(fields.into_entries(&pr.url)),
                Err(MalformedDocument) => {
                    debug!(pull_request = %pr.url, "malformed changelog document");
                    entries.push(ChangeEntry::malformed(&pr.url));
                }
            }
        }
    }

    entries
}

/// Split a block into its non-empty sub-documents on `---` separator lines
fn split_documents(block: &str) -> Vec<String> {
    let mut documents = vec![String::new()];

    for line in block.lines() {
        if line.trim() == "---" {
            documents.push(String::new());
        } else {
            let current = documents.last_mut().expect("documents is never empty");
            current.push_str(line);
            current.push('\n');
        }
    }

    documents.retain(|d| !d.trim().is_empty());
    documents
}

/// Raised when a sub-document is not a parseable flat mapping
struct MalformedDocument;

/// Raw field values of one sub-document, both schema generations
#[derive(Debug, Default)]
struct RawFields {
    section: String,
    module: String,
    summary: String,
    description: String,
    impact: String,
    note: String,
    change_type: String,
    impact_level: String,
}

impl RawFields {
    fn set(&mut self, key: &str, value: String) {
        match key {
            KEY_SECTION => self.section = value,
            KEY_MODULE => self.module = value,
            KEY_SUMMARY => self.summary = value,
            KEY_DESCRIPTION => self.description = value,
            KEY_IMPACT => self.impact = value,
            KEY_NOTE => self.note = value,
            KEY_TYPE => self.change_type = value,
            KEY_IMPACT_LEVEL => self.impact_level = value,
            // Unknown keys are preserved input, not errors; they are
            // simply not part of the canonical record.
            _ => {}
        }
    }

    /// Normalize into canonical entries: the current-generation field wins
    /// over its legacy alias, every field is trimmed, and a comma-separated
    /// section list expands into one entry per listed section.
    fn into_entries(self, pull_request: &str) -> Vec<ChangeEntry> {
        let section = first_non_empty(&self.section, &self.module);
        let summary = first_non_empty(&self.summary, &self.description);
        let impact_text = first_non_empty(&self.impact, &self.note);
        let impact = (!impact_text.is_empty()).then(|| impact_text.to_string());

        let impact_level = if self.impact_level.trim().is_empty() {
            ImpactLevel::Default.as_str().to_string()
        } else {
            self.impact_level.trim().to_string()
        };

        let mut sections: Vec<String> = section
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if sections.is_empty() {
            sections.push(String::new());
        }

        sections
            .into_iter()
            .map(|section| ChangeEntry {
                section,
                change_type: self.change_type.trim().to_string(),
                summary: summary.to_string(),
                impact: impact.clone(),
                impact_level: impact_level.clone(),
                pull_request: pull_request.to_string(),
            })
            .collect()
    }
}

fn first_non_empty<'a>(preferred: &'a str, legacy: &'a str) -> &'a str {
    let preferred = preferred.trim();
    if preferred.is_empty() {
        legacy.trim()
    } else {
        preferred
    }
}

/// Parse one sub-document as a flat mapping of scalars
fn parse_document(document: &str) -> Result<RawFields, MalformedDocument> {
    let lines: Vec<&str> = document.lines().collect();
    let mut fields = RawFields::default();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            i += 1;
            continue;
        }

        let indent = line.len() - line.trim_start().len();
        let (key, rest) = split_mapping_line(trimmed).ok_or(MalformedDocument)?;

        if rest == "|" || rest == "|-" {
            let (value, next) = read_literal_block(&lines, i + 1, indent);
            fields.set(key, value);
            i = next;
        } else {
            fields.set(key, parse_scalar(rest)?);
            i += 1;
        }
    }

    Ok(fields)
}

/// Split a `key: value` line; `None` when the line is not a mapping entry
fn split_mapping_line(line: &str) -> Option<(&str, &str)> {
    let (key, rest) = line.split_once(':')?;
    let key = key.trim();

    let valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid_key {
        return None;
    }

    // The value is either empty or separated from the colon by whitespace.
    if !rest.is_empty() && !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }

    Some((key, rest.trim()))
}

/// Parse a plain or quoted scalar value.
///
/// Plain scalars may not contain a `": "` sequence or end with a colon;
/// a stray nested mapping (`mod: mod: mod:`) is a malformed document.
fn parse_scalar(value: &str) -> Result<String, MalformedDocument> {
    let value = value.trim();

    if value.len() >= 2 {
        let quoted = (value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\''));
        if quoted {
            return Ok(value[1..value.len() - 1].to_string());
        }
    }

    // A '#' preceded by whitespace starts a comment in a plain scalar.
    let value = match value.find(" #") {
        Some(pos) => value[..pos].trim_end(),
        None => value,
    };

    if value.contains(": ") || value.ends_with(':') {
        return Err(MalformedDocument);
    }

    Ok(value.to_string())
}

/// Consume a `|` literal block scalar: lines indented past the key line,
/// de-indented by the first content line's indentation, newlines kept.
fn read_literal_block(lines: &[&str], start: usize, key_indent: usize) -> (String, usize) {
    let mut raw: Vec<&str> = Vec::new();
    let mut i = start;

    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() {
            raw.push("");
            i += 1;
            continue;
        }
        let indent = line.len() - line.trim_start().len();
        if indent <= key_indent {
            break;
        }
        raw.push(line);
        i += 1;
    }

    let strip = raw
        .iter()
        .find(|l| !l.is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .unwrap_or(0);

    let content = raw
        .iter()
        .map(|l| if l.len() >= strip { &l[strip..] } else { "" })
        .collect::<Vec<_>>()
        .join("\n");

    (content, i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiplog_github::Milestone;

    const PR_URL: &str = "https://github.com/owner/repo/pulls/13";

    fn pr() -> PullRequest {
        PullRequest::new(PR_URL, 13, Milestone::new("v1.23.456", 2)).with_title("Shmoo")
    }

    fn entry(section: &str, change_type: &str, summary: &str) -> ChangeEntry {
        ChangeEntry {
            section: section.to_string(),
            change_type: change_type.to_string(),
            summary: summary.to_string(),
            impact: None,
            impact_level: "default".to_string(),
            pull_request: PR_URL.to_string(),
        }
    }

    fn blocks(docs: &[&str]) -> Vec<String> {
        docs.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn parses_minimal_input() {
        let parsed =
            parse_change_entries(&pr(), &blocks(&["section: mod\ntype: fix\nsummary: something was done"]));
        assert_eq!(parsed, vec![entry("mod", "fix", "something was done")]);
    }

    #[test]
    fn parses_legacy_field_names() {
        let parsed = parse_change_entries(
            &pr(),
            &blocks(&["module: mod\ntype: fix\ndescription: something was done\nnote: careful"]),
        );
        assert_eq!(
            parsed,
            vec![ChangeEntry {
                impact: Some("careful".to_string()),
                ..entry("mod", "fix", "something was done")
            }]
        );
    }

    #[test]
    fn canonical_fields_win_over_legacy_aliases() {
        let parsed = parse_change_entries(
            &pr(),
            &blocks(&["module: old\nsection: new\ntype: fix\ndescription: old text\nsummary: new text"]),
        );
        assert_eq!(parsed, vec![entry("new", "fix", "new text")]);
    }

    #[test]
    fn parses_multi_line_literal_field() {
        let block = "section: multiline\ntype: fix\nsummary: |\n  something was done:\n\n  parses input with colons in values";
        let parsed = parse_change_entries(&pr(), &blocks(&[block]));
        assert_eq!(
            parsed,
            vec![entry(
                "multiline",
                "fix",
                "something was done:\n\nparses input with colons in values"
            )]
        );
    }

    #[test]
    fn tolerates_empty_lines() {
        let block = "\nsection: modname\n\ntype: fix\n\nsummary: something was done\n\nimpact: we xpect some outage\n";
        let parsed = parse_change_entries(&pr(), &blocks(&[block]));
        assert_eq!(
            parsed,
            vec![ChangeEntry {
                impact: Some("we xpect some outage".to_string()),
                ..entry("modname", "fix", "something was done")
            }]
        );
    }

    #[test]
    fn parses_multiple_documents_and_preserves_order() {
        let block = "section: mod3\ntype: fix\nsummary: modification3\n---\nsection: mod1\ntype: feature\nsummary: modification1\nimpact: with note\n---\nsection: mod2\ntype: fix\nsummary: modification2";
        let parsed = parse_change_entries(&pr(), &blocks(&[block]));
        assert_eq!(
            parsed,
            vec![
                entry("mod3", "fix", "modification3"),
                ChangeEntry {
                    impact: Some("with note".to_string()),
                    ..entry("mod1", "feature", "modification1")
                },
                entry("mod2", "fix", "modification2"),
            ]
        );
    }

    #[test]
    fn returns_numbers_as_strings() {
        let parsed = parse_change_entries(
            &pr(),
            &blocks(&["section: 11\ntype: fix\nsummary: -55\nimpact: 42"]),
        );
        assert_eq!(
            parsed,
            vec![ChangeEntry {
                impact: Some("42".to_string()),
                ..entry("11", "fix", "-55")
            }]
        );
    }

    #[test]
    fn preserves_leading_zeros() {
        let parsed =
            parse_change_entries(&pr(), &blocks(&["section: mod\ntype: fix\nsummary: 00042"]));
        assert_eq!(parsed[0].summary, "00042");
    }

    #[test]
    fn unknown_keys_yield_empty_fields() {
        let parsed = parse_change_entries(&pr(), &blocks(&["x: y"]));
        assert_eq!(parsed, vec![ChangeEntry::malformed(PR_URL)]);
    }

    #[test]
    fn malformed_yaml_yields_canonical_empty_entry() {
        let parsed = parse_change_entries(&pr(), &blocks(&["mod: mod: mod:"]));
        assert_eq!(parsed, vec![ChangeEntry::malformed(PR_URL)]);
    }

    #[test]
    fn malformed_document_does_not_suppress_valid_siblings() {
        let block = "section: mod1\ntype: fix\nsummary: first\n---\nmod: mod: mod:\n---\nsection: mod3\ntype: fix\nsummary: third";
        let parsed = parse_change_entries(&pr(), &blocks(&[block]));
        assert_eq!(
            parsed,
            vec![
                entry("mod1", "fix", "first"),
                ChangeEntry::malformed(PR_URL),
                entry("mod3", "fix", "third"),
            ]
        );
    }

    #[test]
    fn malformed_block_does_not_suppress_valid_blocks() {
        let parsed = parse_change_entries(&pr(), &blocks(&["mod: mod: mod:", "module: good"]));
        assert_eq!(
            parsed,
            vec![
                ChangeEntry::malformed(PR_URL),
                ChangeEntry {
                    section: "good".to_string(),
                    ..ChangeEntry::malformed(PR_URL)
                },
            ]
        );
    }

    #[test]
    fn empty_block_yields_one_empty_entry() {
        let parsed = parse_change_entries(&pr(), &blocks(&[""]));
        assert_eq!(parsed, vec![ChangeEntry::malformed(PR_URL)]);
    }

    #[test]
    fn zero_blocks_yield_zero_entries() {
        let parsed = parse_change_entries(&pr(), &[]);
        assert!(parsed.is_empty());
    }

    #[test]
    fn parses_impact_level() {
        let block = "section: section\ntype: fix\nsummary: big deal\nimpact: changes much\nimpact_level: high";
        let parsed = parse_change_entries(&pr(), &blocks(&[block]));
        assert_eq!(
            parsed,
            vec![ChangeEntry {
                impact: Some("changes much".to_string()),
                impact_level: "high".to_string(),
                ..entry("section", "fix", "big deal")
            }]
        );
    }

    #[test]
    fn absent_impact_level_defaults() {
        let block = "section: section\ntype: fix\nsummary: big deal\nimpact: changes much\n---\nsection: section\ntype: fix\nsummary: big deal\nimpact: changes much\nimpact_level: default";
        let parsed = parse_change_entries(&pr(), &blocks(&[block]));
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], parsed[1]);
        assert_eq!(parsed[0].impact_level, "default");
    }

    #[test]
    fn expands_comma_separated_sections() {
        let parsed = parse_change_entries(&pr(), &blocks(&["section: modA, modB\ntype: fix\nsummary: s"]));
        assert_eq!(
            parsed,
            vec![entry("modA", "fix", "s"), entry("modB", "fix", "s")]
        );
        assert_eq!(parsed[0].pull_request, parsed[1].pull_request);
    }

    #[test]
    fn unquotes_quoted_scalars() {
        let block = "module: dhctl\ntype: feature\ndescription: \"Control plane readiness check before control plane node converging\"";
        let parsed = parse_change_entries(&pr(), &blocks(&[block]));
        assert_eq!(
            parsed,
            vec![entry(
                "dhctl",
                "feature",
                "Control plane readiness check before control plane node converging"
            )]
        );
    }

    #[test]
    fn strips_plain_scalar_comments() {
        let parsed = parse_change_entries(
            &pr(),
            &blocks(&["section: mod\ntype: fix # not a feature\nsummary: s"]),
        );
        assert_eq!(parsed, vec![entry("mod", "fix", "s")]);
    }
}
