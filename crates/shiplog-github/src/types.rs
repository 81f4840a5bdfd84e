//! Pull-request record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State marker carried by merged pull requests.
///
/// The search query is scoped to merged pull requests; the REST payload
/// only reports "closed", so the client stamps records with this marker.
pub const STATE_MERGED: &str = "MERGED";

/// A pull request as consumed by the changelog pipeline.
///
/// Supplied wholesale per invocation and never mutated; identity is `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Web URL of the pull request
    pub url: String,
    /// Pull request number
    pub number: u64,
    /// Title
    pub title: String,
    /// Free-form Markdown body
    pub body: String,
    /// State marker ("MERGED" for records produced by the client)
    pub state: String,
    /// Merge timestamp, when the API reports one
    pub merged_at: Option<DateTime<Utc>>,
    /// Milestone the pull request belongs to
    pub milestone: Milestone,
}

impl PullRequest {
    /// Create a merged pull request record
    pub fn new(url: impl Into<String>, number: u64, milestone: Milestone) -> Self {
        Self {
            url: url.into(),
            number,
            title: String::new(),
            body: String::new(),
            state: STATE_MERGED.to_string(),
            merged_at: None,
            milestone,
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the state marker
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }
}

/// Milestone reference on a pull request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone title, e.g. "v1.40.2"
    pub title: String,
    /// Milestone number
    pub number: u64,
}

impl Milestone {
    /// Create a milestone reference
    pub fn new(title: impl Into<String>, number: u64) -> Self {
        Self {
            title: title.into(),
            number,
        }
    }
}
