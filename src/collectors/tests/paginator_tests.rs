use super::{FakeSource, Scripted};
use crate::collectors::paginator::{CollectState, CollectionStatus, Paginator, collect};
use std::collections::HashSet;
use std::time::Duration;

#[cfg(test)]
mod termination_tests {
    use super::*;

    #[tokio::test]
    async fn test_three_full_pages_then_empty() {
        let source = FakeSource::new(vec![
            Scripted::Items(100),
            Scripted::Items(100),
            Scripted::Items(100),
            Scripted::Empty,
        ]);

        let collection = collect(&source, FakeSource::first_url(), Duration::ZERO).await;

        assert_eq!(collection.items.len(), 300);
        assert_eq!(collection.pages, 4);
        assert_eq!(collection.status, CollectionStatus::Complete);
        assert!(collection.is_complete());
        assert_eq!(source.requested().len(), 4);
    }

    #[tokio::test]
    async fn test_failure_on_second_page_keeps_first() {
        let source = FakeSource::new(vec![
            Scripted::Items(100),
            Scripted::Fail(500),
            Scripted::Items(100),
        ]);

        let collection = collect(&source, FakeSource::first_url(), Duration::ZERO).await;

        assert_eq!(collection.items.len(), 100);
        assert_eq!(collection.pages, 1);
        assert!(!collection.is_complete());
        match collection.status {
            CollectionStatus::EndedEarly { page, reason } => {
                assert_eq!(page, 2);
                assert!(reason.contains("500"));
            }
            CollectionStatus::Complete => panic!("expected early end"),
        }
        assert_eq!(source.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_on_first_page() {
        let source = FakeSource::new(vec![Scripted::Fail(403)]);

        let collection = collect(&source, FakeSource::first_url(), Duration::ZERO).await;

        assert!(collection.items.is_empty());
        assert!(matches!(
            collection.status,
            CollectionStatus::EndedEarly { page: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_page_wins_over_cursor() {
        let source = FakeSource::new(vec![
            Scripted::Items(5),
            Scripted::Empty,
            Scripted::Items(5),
        ]);

        let collection = collect(&source, FakeSource::first_url(), Duration::ZERO).await;

        assert_eq!(collection.items.len(), 5);
        assert!(collection.is_complete());
        assert_eq!(
            source.requested(),
            vec!["fake://page/1".to_string(), "fake://page/2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_cursor_ends_run() {
        let source = FakeSource::new(vec![Scripted::Items(42)]);

        let collection = collect(&source, FakeSource::first_url(), Duration::ZERO).await;

        assert_eq!(collection.items.len(), 42);
        assert!(collection.is_complete());
        assert_eq!(source.requested().len(), 1);
    }

    #[tokio::test]
    async fn test_order_kept_without_duplicates() {
        let source = FakeSource::new(vec![
            Scripted::Items(3),
            Scripted::Items(2),
            Scripted::Items(4),
        ]);

        let collection = collect(&source, FakeSource::first_url(), Duration::ZERO).await;

        let ids: Vec<u64> = collection.items.iter().map(|pr| pr.id).collect();
        assert_eq!(
            ids,
            vec![1000, 1001, 1002, 2000, 2001, 3000, 3001, 3002, 3003]
        );
        let unique: HashSet<u64> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }
}

#[cfg(test)]
mod state_machine_tests {
    use super::*;

    fn label(state: &CollectState) -> String {
        match state {
            CollectState::Fetching { page, .. } => format!("fetching {}", page),
            CollectState::Accumulating { number, .. } => format!("accumulating {}", number),
            CollectState::Done => "done".to_string(),
            CollectState::Failed { page, .. } => format!("failed {}", page),
        }
    }

    #[tokio::test]
    async fn test_transitions_until_done() {
        let source = FakeSource::new(vec![Scripted::Items(1), Scripted::Items(1)]);
        let mut paginator = Paginator::new(&source, FakeSource::first_url(), Duration::ZERO);

        let mut seen = vec![label(paginator.state())];
        while !paginator.is_finished() {
            seen.push(label(paginator.step().await));
        }

        assert_eq!(
            seen,
            vec![
                "fetching 1",
                "accumulating 1",
                "fetching 2",
                "accumulating 2",
                "done"
            ]
        );
        assert_eq!(paginator.items().len(), 2);
    }

    #[tokio::test]
    async fn test_transitions_until_failed() {
        let source = FakeSource::new(vec![Scripted::Items(1), Scripted::Fail(502)]);
        let mut paginator = Paginator::new(&source, FakeSource::first_url(), Duration::ZERO);

        let mut seen = Vec::new();
        while !paginator.is_finished() {
            seen.push(label(paginator.step().await));
        }

        assert_eq!(seen, vec!["accumulating 1", "fetching 2", "failed 2"]);
    }

    #[tokio::test]
    async fn test_terminal_state_is_stable() {
        let source = FakeSource::new(vec![Scripted::Empty]);
        let mut paginator = Paginator::new(&source, FakeSource::first_url(), Duration::ZERO);

        paginator.step().await;
        paginator.step().await;
        assert!(paginator.is_finished());

        paginator.step().await;
        assert!(matches!(paginator.state(), CollectState::Done));
        assert_eq!(source.requested().len(), 1);
    }

    #[tokio::test]
    async fn test_unfinished_run_is_not_complete() {
        let source = FakeSource::new(vec![Scripted::Items(3), Scripted::Items(3)]);
        let mut paginator = Paginator::new(&source, FakeSource::first_url(), Duration::ZERO);

        paginator.step().await;
        paginator.step().await;

        let collection = paginator.into_collection();
        assert_eq!(collection.items.len(), 3);
        assert!(matches!(
            collection.status,
            CollectionStatus::EndedEarly { page: 2, .. }
        ));
    }
}

#[cfg(test)]
mod delay_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_delay_between_requests_only() {
        let source = FakeSource::new(vec![
            Scripted::Items(1),
            Scripted::Items(1),
            Scripted::Items(1),
        ]);
        let delay = Duration::from_millis(500);

        let start = tokio::time::Instant::now();
        let collection = collect(&source, FakeSource::first_url(), delay).await;
        let elapsed = start.elapsed();

        assert_eq!(collection.items.len(), 3);
        // Two gaps between three requests, none after the last page
        assert!(elapsed >= Duration::from_millis(1000), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(1500), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_after_failure() {
        let source = FakeSource::new(vec![Scripted::Fail(500)]);

        let start = tokio::time::Instant::now();
        collect(&source, FakeSource::first_url(), Duration::from_secs(5)).await;

        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
