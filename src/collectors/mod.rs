pub mod github;
pub mod link;
pub mod paginator;
pub mod source;

#[cfg(test)]
mod tests;

pub use github::{GithubSearch, SearchQuery};
pub use paginator::{Collection, CollectionStatus, Paginator, collect};
pub use source::{FetchError, Page, PageSource};
