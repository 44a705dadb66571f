// Re-export modules
pub mod classifier;
pub mod collectors;
pub mod config;
pub mod error;
pub mod report;
pub mod results;
pub mod taxonomy;

// Re-export commonly used types for convenience
pub use classifier::{Classification, Classifier, categorize};
pub use collectors::{Collection, CollectionStatus, GithubSearch, PageSource};
pub use config::DigestConfig;
pub use error::{DigestError, Result};
pub use report::{Report, ReportFormat};
pub use results::PullRequest;
pub use taxonomy::{ScanOrder, Taxonomy};

use std::path::Path;
use std::time::Duration;

/// Result of a digest run
#[derive(Debug, Clone)]
pub struct DigestOutcome {
    /// The rendered report
    pub rendered: String,
    /// Number of pull requests collected and reported
    pub total: usize,
    /// Whether every page was collected
    pub status: CollectionStatus,
}

impl DigestOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == CollectionStatus::Complete
    }
}

/// Builder for a collect, classify and report run
#[derive(Debug, Clone, Default)]
pub struct Digest {
    config: DigestConfig,
}

impl Digest {
    /// Create a builder for the given repository and label
    pub fn new(repo: &str, label: &str) -> Self {
        Self {
            config: DigestConfig::new(repo, label),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: DigestConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let config = DigestConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a JSON string
    pub fn with_config_str(self, json: &str) -> Result<Self> {
        let config = DigestConfig::from_json(json)?;
        Ok(self.with_config(config))
    }

    pub fn with_repo(mut self, repo: &str) -> Self {
        self.config.repo = repo.to_string();
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.config.label = label.to_string();
        self
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.config.token = Some(token.to_string());
        self
    }

    pub fn with_taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.config.taxonomy = taxonomy;
        self
    }

    pub fn with_scan_order(mut self, order: ScanOrder) -> Self {
        self.config.scan_order = Some(order);
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.config.per_page = per_page;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.config.delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.config.api_base = api_base.to_string();
        self
    }

    pub fn config(&self) -> &DigestConfig {
        &self.config
    }

    /// Collect every matching pull request from the search API
    pub async fn collect(&self) -> Result<Collection> {
        let token = self.config.resolved_token();
        let source = GithubSearch::new(token.as_deref())?;
        self.collect_from(source).await
    }

    /// Collect from an arbitrary page source, starting at the search URL
    pub async fn collect_from<S: PageSource>(&self, source: S) -> Result<Collection> {
        let url = self.config.query().first_page_url(&self.config.api_base)?;
        ::log::info!(
            "Collecting closed pull requests in {} labelled '{}'",
            self.config.repo,
            self.config.label
        );
        Ok(collectors::collect(source, url.as_str(), self.config.delay()).await)
    }

    /// Collect from the search API, classify and render
    pub async fn run(&self, format: ReportFormat) -> Result<DigestOutcome> {
        let taxonomy = self.config.taxonomy.clone().validated()?;
        let collection = self.collect().await?;
        self.summarize(&taxonomy, collection, format)
    }

    /// Collect from `source`, classify and render
    pub async fn run_with<S: PageSource>(
        &self,
        source: S,
        format: ReportFormat,
    ) -> Result<DigestOutcome> {
        let taxonomy = self.config.taxonomy.clone().validated()?;
        let collection = self.collect_from(source).await?;
        self.summarize(&taxonomy, collection, format)
    }

    fn summarize(
        &self,
        taxonomy: &Taxonomy,
        collection: Collection,
        format: ReportFormat,
    ) -> Result<DigestOutcome> {
        let classifier = Classifier::with_order(taxonomy, self.config.scan_order());
        let report =
            Report::build(&collection.items, &classifier).with_status(collection.status.clone());

        ::log::info!(
            "Classified {} pull requests, {} uncategorized",
            report.total(),
            report.uncategorized().len()
        );

        Ok(DigestOutcome {
            rendered: report.render(format)?,
            total: report.total(),
            status: collection.status,
        })
    }
}
