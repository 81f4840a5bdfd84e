//! Section policy validation
//!
//! A configured mapping from section name to an optional forced impact
//! level governs which sections may appear in the changelog and how
//! prominent their entries are allowed to be. With no configuration the
//! validator is a pass-through.

use std::collections::{BTreeMap, BTreeSet};

use shiplog_core::error::PolicyError;
use tracing::debug;

use crate::entry::{ChangeEntry, ImpactLevel, ValidatedChange};

/// Trait for change validators
pub trait Validator: Send + Sync {
    /// Apply the policy to one entry. Pure: no side effects, no global
    /// state, the input is never shared with the output.
    fn validate(&self, entry: ChangeEntry) -> ValidatedChange;
}

/// Build a validator from section-policy definitions.
///
/// An empty definition list yields the pass-through validator; otherwise
/// the definitions are parsed eagerly and a broken policy fails here,
/// before any entries are processed.
pub fn section_policy_validator(definitions: &[String]) -> Result<Box<dyn Validator>, PolicyError> {
    if definitions.is_empty() {
        debug!("no section policy configured, entries pass through");
        return Ok(Box::new(NoopValidator));
    }

    let policy = SectionPolicy::parse(definitions)?;
    Ok(Box::new(PolicyValidator::new(policy)))
}

/// Pass-through validator used when no restrictions are configured
pub struct NoopValidator;

impl Validator for NoopValidator {
    fn validate(&self, entry: ChangeEntry) -> ValidatedChange {
        ValidatedChange::clean(entry)
    }
}

/// Mapping from section name to an optional forced impact level.
///
/// An empty forced level means "any level accepted, no override".
#[derive(Debug, Clone, Default)]
pub struct SectionPolicy {
    forced: BTreeMap<String, String>,
}

impl SectionPolicy {
    /// Parse `"section"` / `"section:level"` definitions. A definition may
    /// list several comma-separated sections sharing one level.
    ///
    /// Duplicates: a later non-empty level may promote an empty one exactly
    /// once per section; an exact repeat or a second distinct level is an
    /// error. Invalid and duplicated definitions are collected together so
    /// neither kind masks the other.
    pub fn parse(definitions: &[String]) -> Result<Self, PolicyError> {
        let mut forced = BTreeMap::new();
        let mut promoted = BTreeSet::new();
        let mut invalid = Vec::new();
        let mut duplicated = Vec::new();

        for definition in definitions {
            let definition = definition.trim();
            if definition.is_empty() {
                invalid.push(definition.to_string());
                continue;
            }

            let parts: Vec<&str> = definition.split(':').collect();
            let (names, level) = match parts.as_slice() {
                [names] => (*names, ""),
                [names, level] => (*names, level.trim()),
                _ => {
                    invalid.push(definition.to_string());
                    continue;
                }
            };

            for name in names.split(',') {
                let name = name.trim();
                if name.is_empty() {
                    invalid.push(definition.to_string());
                    continue;
                }

                match forced.get(name) {
                    None => {
                        forced.insert(name.to_string(), level.to_string());
                    }
                    Some(existing) => {
                        if existing.is_empty() && !level.is_empty() && !promoted.contains(name) {
                            promoted.insert(name.to_string());
                            forced.insert(name.to_string(), level.to_string());
                        } else {
                            duplicated.push(name.to_string());
                        }
                    }
                }
            }
        }

        if !invalid.is_empty() || !duplicated.is_empty() {
            return Err(PolicyError {
                invalid,
                duplicated,
            });
        }

        Ok(Self { forced })
    }

    /// Forced level for a section; `None` when the section is unknown
    fn forced_level(&self, section: &str) -> Option<&str> {
        self.forced.get(section).map(String::as_str)
    }
}

/// Policy-applying validator
pub struct PolicyValidator {
    policy: SectionPolicy,
}

impl PolicyValidator {
    /// Create a validator over a parsed policy
    pub fn new(policy: SectionPolicy) -> Self {
        Self { policy }
    }
}

impl Validator for PolicyValidator {
    fn validate(&self, entry: ChangeEntry) -> ValidatedChange {
        // Low-impact entries are exempt from section governance.
        if entry.impact_level == ImpactLevel::Low.as_str() {
            return ValidatedChange::clean(entry);
        }

        match self.policy.forced_level(&entry.section) {
            None => {
                let error = format!("unknown section \"{}\"", entry.section);
                ValidatedChange::with_policy_error(entry, error)
            }
            Some(forced) if !forced.is_empty() && forced != entry.impact_level => {
                let mut entry = entry;
                entry.impact_level = forced.to_string();
                ValidatedChange::clean(entry)
            }
            Some(_) => ValidatedChange::clean(entry),
        }
    }
}
