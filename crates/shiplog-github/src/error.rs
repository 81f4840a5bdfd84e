//! GitHub client errors

use thiserror::Error;

/// Result type alias using GitHubError
pub type Result<T> = std::result::Result<T, GitHubError>;

/// Errors from the GitHub host client
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Transport-level failure
    #[error("GitHub API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the API
    #[error("GitHub API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// No token available for authenticated requests
    #[error("GitHub token not found (set GITHUB_TOKEN or pass --token)")]
    MissingToken,
}
