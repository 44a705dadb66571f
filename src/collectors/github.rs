use crate::collectors::link;
use crate::collectors::source::{FetchError, Page, PageSource};
use crate::results::SearchResponse;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use url::Url;

/// Largest page size the search endpoint accepts
pub const MAX_PER_PAGE: u32 = 100;

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";

// The search API rejects requests without a user agent
const USER_AGENT_VALUE: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Parameters of a closed-pull-request search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Repository as `owner/name`
    pub repo: String,
    /// Label every result must carry
    pub label: String,
    /// Results per page, clamped to `1..=MAX_PER_PAGE`
    pub per_page: u32,
}

impl SearchQuery {
    pub fn new(repo: &str, label: &str, per_page: u32) -> Self {
        Self {
            repo: repo.to_string(),
            label: label.to_string(),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// The `q` parameter of the search
    pub fn terms(&self) -> String {
        let label = if self.label.chars().any(char::is_whitespace) {
            format!("\"{}\"", self.label)
        } else {
            self.label.clone()
        };
        format!("repo:{} is:pr is:closed label:{}", self.repo, label)
    }

    /// URL of the first page under `api_base`
    pub fn first_page_url(&self, api_base: &str) -> Result<Url, url::ParseError> {
        let endpoint = format!("{}/search/issues", api_base.trim_end_matches('/'));
        Url::parse_with_params(
            &endpoint,
            &[
                ("q", self.terms()),
                ("per_page", self.per_page.to_string()),
            ],
        )
    }
}

/// Page source backed by the GitHub issue search API
#[derive(Debug, Clone)]
pub struct GithubSearch {
    client: reqwest::Client,
}

impl GithubSearch {
    /// Create a source, authenticating with `token` when given
    pub fn new(token: Option<&str>) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_GITHUB_JSON));

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            match HeaderValue::from_str(&format!("token {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => ::log::warn!("Ignoring token with characters not allowed in a header"),
            }
        } else {
            ::log::warn!("No token configured, requests are unauthenticated");
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT_VALUE)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for GithubSearch {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Relations may be split across several `Link` fields
        let next = {
            let links: Vec<&str> = response
                .headers()
                .get_all(LINK)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .collect();
            link::next_link(&links.join(", "))
        };

        let bytes = response.bytes().await?;
        let page: SearchResponse = serde_json::from_slice(&bytes)?;

        Ok(Page::new(page.items, next))
    }
}
