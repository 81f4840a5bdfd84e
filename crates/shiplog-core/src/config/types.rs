//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for shiplog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repository in "owner/name" form
    pub repo: Option<String>,

    /// Section-policy definitions: `"section"` or `"section:level"`,
    /// comma-expandable into multiple sections sharing one definition.
    /// An empty list disables section governance.
    #[serde(default)]
    pub allowed_sections: Vec<String>,

    /// Changelog output configuration
    pub changelog: ChangelogOutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo: None,
            allowed_sections: Vec::new(),
            changelog: ChangelogOutputConfig::default(),
        }
    }
}

/// Where rendered changelog documents are written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogOutputConfig {
    /// Directory for rendered documents
    pub dir: PathBuf,
}

impl Default for ChangelogOutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("CHANGELOG"),
        }
    }
}
