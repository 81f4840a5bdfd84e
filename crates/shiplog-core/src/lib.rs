//! Shiplog Core - shared foundation for changelog collection
//!
//! This crate provides the error taxonomy and configuration types used by
//! the changelog pipeline and the CLI.

pub mod config;
pub mod error;

pub use config::{load_config, load_config_or_default, Config};
pub use error::{ConfigError, PolicyError, RenderError, Result, ShiplogError, VersionError};
