//! Changelog formatters

mod markdown;
mod yaml;

pub use markdown::{format_branch_markdown, format_markdown, VersionChanges};
pub use yaml::format_yaml;
