//! YAML changelog formatter
//!
//! Emits valid entries only, grouped by section and type bucket. Section
//! keys are sorted alphabetically and field order inside an entry is
//! fixed; both come from the serialized types, not a custom key sorter.

use std::collections::BTreeMap;

use serde::Serialize;
use shiplog_core::error::RenderError;
use tracing::{debug, instrument};

use crate::entry::{ChangeType, ImpactLevel, ValidatedChange};

/// One rendered change inside a section bucket
#[derive(Serialize)]
struct ReleaseChange<'a> {
    summary: &'a str,
    pull_request: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    impact: Option<&'a str>,
}

/// Type buckets of one section; `features` serializes before `fixes`
#[derive(Serialize, Default)]
struct SectionChanges<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    features: Vec<ReleaseChange<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fixes: Vec<ReleaseChange<'a>>,
}

/// Render the changelog as a YAML document.
///
/// Structurally invalid entries and low-impact entries are excluded;
/// chore and docs changes contribute no bucket. Within a bucket, the
/// aggregator order is preserved. The output round-trips: re-parsing
/// reconstructs every string value exactly, multi-line impacts included.
#[instrument(skip(changes), fields(change_count = changes.len()))]
pub fn format_yaml(changes: &[ValidatedChange]) -> Result<String, RenderError> {
    let mut sections: BTreeMap<&str, SectionChanges> = BTreeMap::new();

    for change in changes {
        if !change.is_valid() {
            continue;
        }
        let entry = &change.entry;
        if entry.impact_level == ImpactLevel::Low.as_str() {
            continue;
        }

        let rendered = ReleaseChange {
            summary: &entry.summary,
            pull_request: &entry.pull_request,
            impact: entry.impact.as_deref(),
        };

        match entry.change_type.parse::<ChangeType>() {
            Ok(ChangeType::Feature) => sections
                .entry(entry.section.as_str())
                .or_default()
                .features
                .push(rendered),
            Ok(ChangeType::Fix) => sections
                .entry(entry.section.as_str())
                .or_default()
                .fixes
                .push(rendered),
            _ => {}
        }
    }

    let output = serde_yaml::to_string(&sections)?;
    debug!(output_len = output.len(), "yaml changelog formatted");
    Ok(output)
}
