use crate::taxonomy::TaxonomyError;
use thiserror::Error;

/// Errors that stop a run before any report is produced
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid taxonomy: {0}")]
    Taxonomy(#[from] TaxonomyError),

    #[error("invalid search URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("could not create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, DigestError>;
