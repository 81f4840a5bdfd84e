//! Shiplog GitHub - pull-request records and the host client
//!
//! The changelog pipeline consumes already-fetched [`PullRequest`] records;
//! this crate owns that record type and the paginated GitHub search client
//! that produces it.

pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::GitHubClient;
pub use error::{GitHubError, Result};
pub use traits::PullSource;
pub use types::{Milestone, PullRequest, STATE_MERGED};
