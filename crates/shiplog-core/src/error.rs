//! Error types for shiplog

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ShiplogError
pub type Result<T> = std::result::Result<T, ShiplogError>;

/// Main error type for shiplog operations
#[derive(Debug, Error)]
pub enum ShiplogError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Milestone-version errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Section-policy configuration errors
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// Rendering errors
    #[error(transparent)]
    Render(#[from] RenderError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Milestone-version errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Milestone title does not carry a v<major>.<minor>.<patch> version
    #[error("unexpected version \"{0}\"")]
    UnexpectedVersion(String),
}

/// Section-policy configuration error.
///
/// Both problem kinds are collected before the error is raised so that an
/// invalid definition does not mask a duplicated one, and vice versa.
#[derive(Debug, Error)]
#[error("{}", policy_error_message(.invalid, .duplicated))]
pub struct PolicyError {
    /// Definitions that could not be parsed
    pub invalid: Vec<String>,
    /// Sections defined more than once
    pub duplicated: Vec<String>,
}

fn policy_error_message(invalid: &[String], duplicated: &[String]) -> String {
    let mut parts = Vec::new();
    if !invalid.is_empty() {
        parts.push(format!("invalid section definitions: {}", invalid.join(", ")));
    }
    if !duplicated.is_empty() {
        parts.push(format!(
            "duplicated sections in definitions: {}",
            duplicated.join(", ")
        ));
    }
    parts.join("; ")
}

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    /// YAML emission failed
    #[error("YAML emission failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ShiplogError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}
