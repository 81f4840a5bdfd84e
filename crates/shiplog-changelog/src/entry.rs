//! Change entry model

use serde::{Deserialize, Serialize};

/// A changelog entry recovered from a pull-request description.
///
/// Two schema generations are reconciled at parse time (legacy
/// `module`/`description`/`note` against current `section`/`summary`/
/// `impact`), so the rest of the pipeline only ever sees this one record.
/// `change_type` and `impact_level` keep the raw author input; membership
/// in the known sets is checked by [`ChangeEntry::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// Logical module/component the change belongs to
    pub section: String,
    /// Change kind: fix, feature, chore or docs
    #[serde(rename = "type")]
    pub change_type: String,
    /// One-line human-readable description
    pub summary: String,
    /// Optional note on user-visible consequences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    /// Visibility classification: default, low, high or none
    pub impact_level: String,
    /// URL back-reference to the owning pull request; always derived from
    /// the pull request itself, never from parsed content
    pub pull_request: String,
}

impl ChangeEntry {
    /// The canonical placeholder for a sub-document that failed to parse
    /// or carried no content. It keeps its `pull_request` so the defect can
    /// be surfaced to the author instead of silently dropped.
    pub fn malformed(pull_request: impl Into<String>) -> Self {
        Self {
            section: String::new(),
            change_type: String::new(),
            summary: String::new(),
            impact: None,
            impact_level: ImpactLevel::Default.as_str().to_string(),
            pull_request: pull_request.into(),
        }
    }

    /// Structural validation, independent of any section policy.
    ///
    /// Errors are accumulated, then sorted lexicographically for
    /// deterministic display. Entries with impact level `none` are not
    /// checked at all.
    pub fn validate(&self) -> Vec<String> {
        if self.impact_level == ImpactLevel::None.as_str() {
            return Vec::new();
        }

        let mut errors = Vec::new();

        if !self.impact_level.is_empty() && self.impact_level.parse::<ImpactLevel>().is_err() {
            errors.push(format!("invalid impact level \"{}\"", self.impact_level));
        }

        if self.impact_level == ImpactLevel::High.as_str()
            && self.impact.as_deref().unwrap_or_default().is_empty()
        {
            errors.push("missing high impact detail".to_string());
        }

        if self.section.is_empty() {
            errors.push("missing section".to_string());
        }
        if self.summary.is_empty() {
            errors.push("missing summary".to_string());
        }

        if self.change_type.is_empty() {
            errors.push("missing type".to_string());
        } else if self.change_type.parse::<ChangeType>().is_err() {
            errors.push(format!("invalid type \"{}\"", self.change_type));
        }

        errors.sort();
        errors
    }

    /// Check structural validity
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Pull-request number, parsed from the trailing path segment of
    /// `pull_request`. Tolerates bare `owner/13`-style references.
    pub fn pull_number(&self) -> u64 {
        self.pull_request
            .rsplit('/')
            .next()
            .map(|segment| {
                let digits: String = segment
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.parse().unwrap_or(0)
            })
            .unwrap_or(0)
    }
}

/// A change entry with section policy applied.
///
/// Policy problems are layered as extra errors next to the entry; the
/// combined error list is the concatenation of structural and policy
/// errors, sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedChange {
    /// The underlying entry (possibly rewritten by the policy)
    pub entry: ChangeEntry,
    policy_errors: Vec<String>,
}

impl ValidatedChange {
    /// An entry that passed the policy untouched
    pub fn clean(entry: ChangeEntry) -> Self {
        Self {
            entry,
            policy_errors: Vec::new(),
        }
    }

    /// An entry flagged by the policy
    pub fn with_policy_error(entry: ChangeEntry, error: impl Into<String>) -> Self {
        Self {
            entry,
            policy_errors: vec![error.into()],
        }
    }

    /// Combined structural and policy errors, sorted
    pub fn errors(&self) -> Vec<String> {
        let mut errors = self.entry.validate();
        errors.extend(self.policy_errors.iter().cloned());
        errors.sort();
        errors
    }

    /// Check combined validity
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }
}

/// Change type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    /// Bug fix
    Fix,
    /// New feature
    Feature,
    /// Maintenance work
    Chore,
    /// Documentation
    Docs,
}

impl ChangeType {
    /// Canonical string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fix => "fix",
            Self::Feature => "feature",
            Self::Chore => "chore",
            Self::Docs => "docs",
        }
    }
}

impl std::str::FromStr for ChangeType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fix" => Ok(Self::Fix),
            "feature" => Ok(Self::Feature),
            "chore" => Ok(Self::Chore),
            "docs" => Ok(Self::Docs),
            _ => Err(()),
        }
    }
}

/// Impact level enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImpactLevel {
    /// Ordinary visibility
    #[default]
    Default,
    /// Hidden from Markdown listings, exempt from section governance
    Low,
    /// Surfaced in the release digest; requires an impact note
    High,
    /// Exempt from structural validation
    None,
}

impl ImpactLevel {
    /// Canonical string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Low => "low",
            Self::High => "high",
            Self::None => "none",
        }
    }
}

impl std::str::FromStr for ImpactLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "low" => Ok(Self::Low),
            "high" => Ok(Self::High),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}
