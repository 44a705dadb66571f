use crate::collectors::github::{MAX_PER_PAGE, SearchQuery};
use crate::error::Result;
use crate::taxonomy::{ScanOrder, Taxonomy};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Environment variable consulted when no token is configured
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Configuration for one digest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Repository to search, as `owner/name`
    #[serde(default = "default_repo")]
    pub repo: String,

    /// Label every pull request must carry
    #[serde(default = "default_label")]
    pub label: String,

    /// Access token sent as `Authorization: token ...`
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Results per page (the API caps this at 100)
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Pause between page requests, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Base URL of the API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Categories and their keywords
    #[serde(default)]
    pub taxonomy: Taxonomy,

    /// Scan order override; the taxonomy's default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_order: Option<ScanOrder>,
}

/// Default repository
fn default_repo() -> String {
    "PaddlePaddle/Paddle".to_string()
}

/// Default label
fn default_label() -> String {
    "Intel".to_string()
}

/// Default page size
fn default_per_page() -> u32 {
    MAX_PER_PAGE
}

/// Default delay between requests
fn default_delay_ms() -> u64 {
    500
}

/// Default API base URL
fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

/// A non-empty configured token wins over the fallback
fn pick_token(configured: Option<&str>, fallback: Option<String>) -> Option<String> {
    match configured {
        Some(token) if !token.is_empty() => Some(token.to_string()),
        _ => fallback.filter(|t| !t.is_empty()),
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            repo: default_repo(),
            label: default_label(),
            token: None,
            per_page: default_per_page(),
            delay_ms: default_delay_ms(),
            api_base: default_api_base(),
            taxonomy: Taxonomy::default(),
            scan_order: None,
        }
    }
}

impl DigestConfig {
    /// Create a configuration for a repository and label with default values
    pub fn new(repo: &str, label: &str) -> Self {
        Self {
            repo: repo.to_string(),
            label: label.to_string(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// The configured token, or the one from the environment
    pub fn resolved_token(&self) -> Option<String> {
        pick_token(self.token.as_deref(), std::env::var(TOKEN_ENV_VAR).ok())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn scan_order(&self) -> ScanOrder {
        self.scan_order
            .unwrap_or_else(|| self.taxonomy.default_scan_order())
    }

    pub fn query(&self) -> SearchQuery {
        SearchQuery::new(&self.repo, &self.label, self.per_page)
    }
}
