//! Milestone version handling

use std::sync::LazyLock;

use regex::Regex;
use shiplog_core::error::VersionError;

/// Regex accepting milestone titles that carry a v<major>.<minor>.<patch>
/// triple. Intentionally unanchored: a title merely containing the shape
/// passes, and the captured triple is what the version operates on.
static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v(\d+)\.(\d+)\.(\d+)").expect("Invalid regex"));

/// A patch-release milestone version, parsed from a milestone title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneVersion {
    raw: String,
    major: u64,
    minor: u64,
    patch: u64,
}

impl MilestoneVersion {
    /// Parse a milestone title
    pub fn parse(title: &str) -> Result<Self, VersionError> {
        let caps = VERSION_REGEX
            .captures(title)
            .ok_or_else(|| VersionError::UnexpectedVersion(title.to_string()))?;

        let number = |i: usize| {
            caps[i]
                .parse::<u64>()
                .map_err(|_| VersionError::UnexpectedVersion(title.to_string()))
        };

        Ok(Self {
            raw: title.to_string(),
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
        })
    }

    /// The title the version was parsed from
    pub fn title(&self) -> &str {
        &self.raw
    }

    /// The enclosing minor version, e.g. "v1.39" for "v1.39.3"
    pub fn to_minor(&self) -> String {
        format!("v{}.{}", self.major, self.minor)
    }

    /// The patch number, e.g. 3 for "v1.39.3"
    pub fn patch_num(&self) -> u64 {
        self.patch
    }

    /// Sibling patch versions of the same minor version, strictly
    /// descending from `patch - 1` down to `0`, excluding this version.
    /// Each call yields a fresh sequence.
    pub fn down_to_zero(&self) -> impl Iterator<Item = String> + '_ {
        let minor = self.to_minor();
        (0..self.patch).rev().map(move |p| format!("{}.{}", minor, p))
    }
}

impl std::fmt::Display for MilestoneVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
