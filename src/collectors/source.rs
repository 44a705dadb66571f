use crate::results::PullRequest;
use async_trait::async_trait;
use thiserror::Error;

/// A single page of results and the cursor to the following one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<PullRequest>,
    pub next: Option<String>,
}

impl Page {
    pub fn new(items: Vec<PullRequest>, next: Option<String>) -> Self {
        Self { items, next }
    }
}

/// Failure to fetch one page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode page: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Something that serves pages of pull requests by URL
#[async_trait]
pub trait PageSource {
    /// Fetch the page at `url`
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

#[async_trait]
impl<S: PageSource + Send + Sync + ?Sized> PageSource for &S {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        (**self).fetch(url).await
    }
}
