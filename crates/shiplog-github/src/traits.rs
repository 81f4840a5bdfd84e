//! Source seam for pull-request records

use async_trait::async_trait;

use crate::error::Result;
use crate::types::PullRequest;

/// A source of merged pull requests for a milestone.
///
/// The changelog pipeline is written against this trait so that release
/// collection can be driven by the GitHub client in production and by
/// in-memory fixtures in tests.
#[async_trait]
pub trait PullSource: Send + Sync {
    /// Fetch the merged pull requests attached to a milestone title.
    ///
    /// An unknown milestone yields an empty list, not an error.
    async fn milestone_pulls(&self, milestone: &str) -> Result<Vec<PullRequest>>;
}
