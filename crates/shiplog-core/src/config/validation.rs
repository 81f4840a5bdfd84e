//! Configuration validation

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate a loaded configuration.
///
/// Shape checks only. The authoritative parsing of `allowed_sections`
/// definitions (levels, duplicates) happens when the section policy is
/// built, before any entries are processed.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(repo) = &config.repo {
        let mut parts = repo.split('/');
        let owner = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        if owner.is_empty() || name.is_empty() || parts.next().is_some() {
            return Err(ConfigError::InvalidValue {
                field: "repo".to_string(),
                message: format!("expected \"owner/name\", got \"{}\"", repo),
            }
            .into());
        }
    }

    for def in &config.allowed_sections {
        if def.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "allowed_sections".to_string(),
                message: "empty section definition".to_string(),
            }
            .into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_default() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn accepts_owner_name_repo() {
        let config = Config {
            repo: Some("owner/name".to_string()),
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_repo_without_owner() {
        let config = Config {
            repo: Some("/name".to_string()),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_blank_section_definition() {
        let config = Config {
            allowed_sections: vec!["  ".to_string()],
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
