use serde::{Deserialize, Serialize};

/// A pull request returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request number (unique within a repository)
    #[serde(rename = "number")]
    pub id: u64,

    /// Title of the pull request
    #[serde(default)]
    pub title: String,

    /// Description body (may be absent)
    #[serde(default)]
    pub body: Option<String>,

    /// Link to the pull request on the web
    #[serde(rename = "html_url", default)]
    pub url: String,
}

impl PullRequest {
    /// Create a new pull request record
    pub fn new(id: u64, title: &str, body: Option<&str>, url: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            body: body.map(str::to_string),
            url: url.to_string(),
        }
    }
}

/// One page of a search response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: Option<u64>,

    #[serde(default)]
    pub items: Vec<PullRequest>,
}
