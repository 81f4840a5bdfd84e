//! GitHub API client
//!
//! Fetches merged pull requests for a milestone through the search API,
//! and single pull requests for check mode.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{GitHubError, Result};
use crate::traits::PullSource;
use crate::types::{Milestone, PullRequest, STATE_MERGED};

const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "shiplog";
const PAGE_SIZE: usize = 100;

/// GitHub host client scoped to one repository
pub struct GitHubClient {
    api_url: String,
    repo: String,
    token: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    html_url: String,
    number: u64,
    title: String,
    body: Option<String>,
    milestone: Option<MilestonePayload>,
}

#[derive(Debug, Deserialize)]
struct MilestonePayload {
    title: String,
    number: u64,
}

#[derive(Debug, Deserialize)]
struct PullPayload {
    html_url: String,
    number: u64,
    title: String,
    body: Option<String>,
    state: String,
    merged_at: Option<chrono::DateTime<chrono::Utc>>,
    milestone: Option<MilestonePayload>,
}

impl GitHubClient {
    /// Create a client for `owner/name` with an API token
    pub fn new(repo: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            repo: repo.into(),
            token: token.into(),
            client: Client::new(),
        }
    }

    /// Point the client at a different API root (test servers)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GitHubError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    fn map_search_item(&self, item: SearchItem) -> PullRequest {
        let milestone = item
            .milestone
            .map(|m| Milestone::new(m.title, m.number))
            .unwrap_or_else(|| Milestone::new("", 0));

        PullRequest::new(item.html_url, item.number, milestone)
            .with_title(item.title)
            .with_body(item.body.unwrap_or_default())
    }

    /// Fetch a single pull request by number (check mode)
    #[instrument(skip(self), fields(repo = %self.repo))]
    pub async fn pull(&self, number: u64) -> Result<PullRequest> {
        let url = format!("{}/repos/{}/pulls/{}", self.api_url, self.repo, number);
        debug!(%url, "fetching pull request");

        let payload: PullPayload = self.get_json(&url, &[]).await?;

        let state = if payload.merged_at.is_some() {
            STATE_MERGED.to_string()
        } else {
            payload.state.to_uppercase()
        };
        let milestone = payload
            .milestone
            .map(|m| Milestone::new(m.title, m.number))
            .unwrap_or_else(|| Milestone::new("", 0));

        let mut pr = PullRequest::new(payload.html_url, payload.number, milestone)
            .with_title(payload.title)
            .with_body(payload.body.unwrap_or_default())
            .with_state(state);
        pr.merged_at = payload.merged_at;
        Ok(pr)
    }
}

#[async_trait]
impl PullSource for GitHubClient {
    /// Fetch the merged pull requests attached to a milestone, paginated
    /// until the search is exhausted. Automation PRs labeled `auto` are
    /// excluded at the query level.
    #[instrument(skip(self), fields(repo = %self.repo))]
    async fn milestone_pulls(&self, milestone: &str) -> Result<Vec<PullRequest>> {
        let q = format!(
            "repo:{} is:pr is:merged milestone:{} -label:auto",
            self.repo, milestone
        );
        let url = format!("{}/search/issues", self.api_url);

        let mut pulls = Vec::new();
        let mut page = 1usize;
        loop {
            debug!(page, "fetching search page");
            let response: SearchResponse = self
                .get_json(
                    &url,
                    &[
                        ("q", q.clone()),
                        ("per_page", PAGE_SIZE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;

            let count = response.items.len();
            pulls.extend(response.items.into_iter().map(|i| self.map_search_item(i)));

            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        debug!(total = pulls.len(), "milestone pulls fetched");
        Ok(pulls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_item_maps_to_merged_record() {
        let client = GitHubClient::new("owner/repo", "token");
        let item: SearchItem = serde_json::from_value(serde_json::json!({
            "html_url": "https://github.com/owner/repo/pull/353",
            "number": 353,
            "title": "converge control plane",
            "body": "```changes\nsection: dhctl\n```",
            "milestone": { "title": "v1.31.0", "number": 2 }
        }))
        .unwrap();

        let pr = client.map_search_item(item);
        assert_eq!(pr.state, STATE_MERGED);
        assert_eq!(pr.number, 353);
        assert_eq!(pr.milestone.title, "v1.31.0");
    }

    #[test]
    fn search_item_tolerates_missing_body_and_milestone() {
        let client = GitHubClient::new("owner/repo", "token");
        let item: SearchItem = serde_json::from_value(serde_json::json!({
            "html_url": "https://github.com/owner/repo/pull/12",
            "number": 12,
            "title": "no changelog",
            "body": null,
            "milestone": null
        }))
        .unwrap();

        let pr = client.map_search_item(item);
        assert_eq!(pr.body, "");
        assert_eq!(pr.milestone.title, "");
    }
}
