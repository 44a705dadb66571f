use crate::collectors::source::{FetchError, Page, PageSource};
use crate::results::PullRequest;
use std::time::Duration;

/// Delay between consecutive page requests
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

/// State of a pagination run.
///
/// `Fetching` and `Accumulating` alternate until the run reaches one of the
/// terminal states `Done` or `Failed`.
#[derive(Debug)]
pub enum CollectState {
    /// About to request `url`, the 1-based page `page`
    Fetching { url: String, page: usize },
    /// Page `number` arrived and is waiting to be appended
    Accumulating { page: Page, number: usize },
    /// An empty page or a missing cursor ended the run
    Done,
    /// Fetching page `page` failed; items gathered before it are kept
    Failed { page: usize, error: FetchError },
}

impl CollectState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CollectState::Done | CollectState::Failed { .. })
    }
}

/// Whether a collection saw every page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionStatus {
    Complete,
    EndedEarly { page: usize, reason: String },
}

/// Items gathered by a pagination run
#[derive(Debug, Clone)]
pub struct Collection {
    pub items: Vec<PullRequest>,
    /// Pages fetched successfully, including a final empty one
    pub pages: usize,
    pub status: CollectionStatus,
}

impl Collection {
    pub fn is_complete(&self) -> bool {
        self.status == CollectionStatus::Complete
    }
}

/// Follows `next` cursors from a first URL, one page at a time
pub struct Paginator<S> {
    source: S,
    delay: Duration,
    state: CollectState,
    items: Vec<PullRequest>,
    pages: usize,
}

impl<S: PageSource> Paginator<S> {
    pub fn new(source: S, first_url: impl Into<String>, delay: Duration) -> Self {
        Self {
            source,
            delay,
            state: CollectState::Fetching {
                url: first_url.into(),
                page: 1,
            },
            items: Vec::new(),
            pages: 0,
        }
    }

    pub fn state(&self) -> &CollectState {
        &self.state
    }

    /// Items accumulated so far, in the order pages returned them
    pub fn items(&self) -> &[PullRequest] {
        &self.items
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Perform one transition and return the new state.
    ///
    /// Terminal states are left unchanged.
    pub async fn step(&mut self) -> &CollectState {
        let state = std::mem::replace(&mut self.state, CollectState::Done);

        self.state = match state {
            CollectState::Fetching { url, page } => {
                ::log::info!("Fetching URL: {}", url);
                match self.source.fetch(&url).await {
                    Ok(fetched) => {
                        self.pages += 1;
                        CollectState::Accumulating {
                            page: fetched,
                            number: page,
                        }
                    }
                    Err(error) => {
                        ::log::error!("Failed to fetch page {}: {}", page, error);
                        CollectState::Failed { page, error }
                    }
                }
            }
            CollectState::Accumulating { page, number } => {
                if page.items.is_empty() {
                    // An empty page ends the run even if it carries a cursor
                    ::log::info!("No more items found on page {}", number);
                    CollectState::Done
                } else {
                    self.items.extend(page.items);
                    ::log::info!("Fetched {} pull requests so far", self.items.len());

                    match page.next {
                        Some(url) => {
                            if !self.delay.is_zero() {
                                ::log::trace!("Waiting {:?} before next request", self.delay);
                                tokio::time::sleep(self.delay).await;
                            }
                            CollectState::Fetching {
                                url,
                                page: number + 1,
                            }
                        }
                        None => {
                            ::log::debug!("No next link after page {}", number);
                            CollectState::Done
                        }
                    }
                }
            }
            terminal => terminal,
        };

        &self.state
    }

    /// Step until a terminal state and hand back what was collected
    pub async fn run(mut self) -> Collection {
        while !self.is_finished() {
            self.step().await;
        }
        self.into_collection()
    }

    /// Convert into a collection; a run still in progress counts as ended early
    pub fn into_collection(self) -> Collection {
        let status = match self.state {
            CollectState::Done => CollectionStatus::Complete,
            CollectState::Failed { page, error } => CollectionStatus::EndedEarly {
                page,
                reason: error.to_string(),
            },
            CollectState::Fetching { page, .. } | CollectState::Accumulating { number: page, .. } => {
                CollectionStatus::EndedEarly {
                    page,
                    reason: "collection was interrupted".to_string(),
                }
            }
        };

        if let CollectionStatus::EndedEarly { page, reason } = &status {
            ::log::warn!(
                "Collection ended early at page {} with {} items: {}",
                page,
                self.items.len(),
                reason
            );
        }

        Collection {
            items: self.items,
            pages: self.pages,
            status,
        }
    }
}

/// Collect every page reachable from `first_url`
pub async fn collect<S: PageSource>(source: S, first_url: &str, delay: Duration) -> Collection {
    Paginator::new(source, first_url, delay).run().await
}
