mod paginator_tests;

use crate::collectors::source::{FetchError, Page, PageSource};
use crate::results::PullRequest;
use async_trait::async_trait;
use std::sync::Mutex;

/// What the fake source serves for one page
#[derive(Debug, Clone, Copy)]
pub(crate) enum Scripted {
    Items(usize),
    Empty,
    Fail(u16),
}

/// In-memory page source serving `fake://page/N` URLs from a script
pub(crate) struct FakeSource {
    script: Vec<Scripted>,
    requested: Mutex<Vec<String>>,
}

impl FakeSource {
    pub(crate) fn new(script: Vec<Scripted>) -> Self {
        Self {
            script,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn first_url() -> &'static str {
        "fake://page/1"
    }

    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    fn next_url(&self, number: usize) -> Option<String> {
        (number < self.script.len()).then(|| format!("fake://page/{}", number + 1))
    }
}

#[async_trait]
impl PageSource for FakeSource {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());

        let number: usize = url
            .strip_prefix("fake://page/")
            .and_then(|n| n.parse().ok())
            .unwrap_or(0);
        let Some(entry) = number.checked_sub(1).and_then(|i| self.script.get(i)) else {
            return Err(FetchError::Status {
                status: 404,
                body: "no such page".to_string(),
            });
        };

        match *entry {
            Scripted::Items(count) => {
                let items = (0..count)
                    .map(|i| {
                        let id = (number * 1000 + i) as u64;
                        PullRequest::new(
                            id,
                            &format!("PR {}", id),
                            None,
                            &format!("https://github.com/o/r/pull/{}", id),
                        )
                    })
                    .collect();
                Ok(Page::new(items, self.next_url(number)))
            }
            // Still advertises a cursor when one could follow
            Scripted::Empty => Ok(Page::new(Vec::new(), self.next_url(number))),
            Scripted::Fail(status) => Err(FetchError::Status {
                status,
                body: "server error".to_string(),
            }),
        }
    }
}
