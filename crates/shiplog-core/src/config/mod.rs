//! Configuration for shiplog

mod loader;
mod types;
mod validation;

pub use loader::{find_config, load_config, load_config_from_dir, load_config_or_default};
pub use types::{ChangelogOutputConfig, Config};
pub use validation::validate_config;

/// File names probed when discovering a configuration file
pub fn config_file_names() -> &'static [&'static str] {
    &["shiplog.toml", ".shiplog.toml", "shiplog.yaml", ".shiplog.yaml"]
}
