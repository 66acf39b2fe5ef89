//! Bulk selection walks across pages.

mod common;

use std::sync::Arc;

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use artic_lib::BulkSelectRequest;
use artic_lib::BulkSelector;
use artic_lib::SelectionStore;
use artic_lib::error::Error;
use artic_lib::error::ValidationError;

use common::MemorySource;
use common::wait_for_fetch;

fn request(count: i64) -> BulkSelectRequest {
    BulkSelectRequest::new(count).unwrap()
}

fn selector(source: &Arc<MemorySource>) -> (BulkSelector<Arc<MemorySource>>, SelectionStore) {
    let selection = SelectionStore::new();
    (BulkSelector::new(Arc::clone(source), selection.clone()), selection)
}

#[tokio::test]
async fn test_fifteen_rows_span_two_pages() {
    let source = Arc::new(MemorySource::new(25, 12));
    let (selector, selection) = selector(&source);

    let outcome = selector
        .run(request(15), 1, 25, &CancellationToken::new())
        .await
        .unwrap();

    let mut expected = source.ids_on_page(1);
    expected.extend(&source.ids_on_page(2)[..3]);

    assert_eq!(outcome.taken, expected);
    assert_eq!(outcome.remaining, 0);
    assert_eq!(outcome.pages_fetched, 2);
    assert!(outcome.is_complete());
    assert!(!outcome.cancelled);
    assert_eq!(selection.len(), 15);
    assert_eq!(source.fetches(), vec![1, 2]);
}

#[tokio::test]
async fn test_takes_only_needed_prefix_of_last_page() {
    let source = Arc::new(MemorySource::new(25, 12));
    let (selector, selection) = selector(&source);

    let outcome = selector
        .run(request(5), 2, 25, &CancellationToken::new())
        .await
        .unwrap();

    let page_two = source.ids_on_page(2);
    assert_eq!(outcome.taken, &page_two[..5]);
    for id in &page_two[5..] {
        assert!(!selection.is_selected(*id));
    }
    for id in source.ids_on_page(1) {
        assert!(!selection.is_selected(id));
    }
    assert_eq!(source.fetches(), vec![2]);
}

#[tokio::test]
async fn test_exact_page_boundary_does_not_fetch_next_page() {
    let source = Arc::new(MemorySource::new(36, 12));
    let (selector, _selection) = selector(&source);

    let outcome = selector
        .run(request(24), 1, 36, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.taken.len(), 24);
    assert_eq!(source.fetches(), vec![1, 2]);
}

#[tokio::test]
async fn test_more_than_remaining_selects_everything_left() {
    let source = Arc::new(MemorySource::new(25, 12));
    let (selector, selection) = selector(&source);

    let outcome = selector
        .run(request(100), 2, 25, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.taken.len(), 13);
    assert_eq!(outcome.remaining, 87);
    assert!(!outcome.is_complete());
    assert_eq!(selection.len(), 13);
    assert_eq!(source.fetches(), vec![2, 3]);
}

#[tokio::test]
async fn test_start_past_last_page_selects_nothing() {
    let source = Arc::new(MemorySource::new(25, 12));
    let (selector, selection) = selector(&source);

    let outcome = selector
        .run(request(5), 4, 25, &CancellationToken::new())
        .await
        .unwrap();

    assert!(outcome.taken.is_empty());
    assert_eq!(outcome.remaining, 5);
    assert!(selection.is_empty());
    assert!(source.fetches().is_empty());
}

#[tokio::test]
async fn test_empty_collection() {
    let source = Arc::new(MemorySource::new(0, 12));
    let (selector, _selection) = selector(&source);

    let outcome = selector
        .run(request(3), 1, 0, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.remaining, 3);
    assert!(source.fetches().is_empty());
}

#[tokio::test]
async fn test_already_selected_rows_count_toward_total() {
    let source = Arc::new(MemorySource::new(25, 12));
    let (selector, selection) = selector(&source);
    let first = source.ids_on_page(1)[0];
    selection.insert(first);

    let outcome = selector
        .run(request(3), 1, 25, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.taken, &source.ids_on_page(1)[..3]);
    assert_eq!(selection.len(), 3);
}

#[tokio::test]
async fn test_failed_page_keeps_earlier_pages() {
    let source = Arc::new(MemorySource::new(25, 12).failing_on(2));
    let (selector, selection) = selector(&source);

    let err = selector
        .run(request(15), 1, 25, &CancellationToken::new())
        .await
        .unwrap_err();

    match &err {
        Error::BulkSelect { page, progress, .. } => {
            assert_eq!(*page, 2);
            assert_eq!(progress.taken, source.ids_on_page(1));
            assert_eq!(progress.remaining, 3);
        }
        other => panic!("expected BulkSelect error, got {other:?}"),
    }
    assert_eq!(err.status_code(), Some(503));
    for id in source.ids_on_page(1) {
        assert!(selection.is_selected(id));
    }
    assert_eq!(selection.len(), 12);
}

#[tokio::test]
async fn test_failed_first_page_selects_nothing() {
    let source = Arc::new(MemorySource::new(25, 12).failing_on(1));
    let (selector, selection) = selector(&source);

    let err = selector
        .run(request(2), 1, 25, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::BulkSelect { page: 1, .. }));
    assert!(selection.is_empty());
}

#[tokio::test]
async fn test_cancel_keeps_rows_already_added() {
    let gate = Arc::new(Notify::new());
    let source = Arc::new(MemorySource::new(40, 12).gated_on(2, Arc::clone(&gate)));
    let (selector, selection) = selector(&source);
    let cancel = CancellationToken::new();

    let token = cancel.clone();
    let walk = tokio::spawn(async move { selector.run(request(30), 1, 40, &token).await });

    wait_for_fetch(&source, 2).await;
    cancel.cancel();

    let outcome = walk.await.unwrap().unwrap();

    assert!(outcome.cancelled);
    assert_eq!(outcome.taken, source.ids_on_page(1));
    assert_eq!(outcome.remaining, 18);
    assert_eq!(selection.len(), 12);
    assert_eq!(source.fetches(), vec![1, 2]);
}

#[tokio::test]
async fn test_cancel_before_start_fetches_nothing() {
    let source = Arc::new(MemorySource::new(25, 12));
    let (selector, selection) = selector(&source);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = selector.run(request(5), 1, 25, &cancel).await.unwrap();

    assert!(outcome.cancelled);
    assert!(selection.is_empty());
    assert!(source.fetches().is_empty());
}

#[tokio::test]
async fn test_page_zero_is_rejected() {
    let source = Arc::new(MemorySource::new(25, 12));
    let (selector, _selection) = selector(&source);

    let err = selector
        .run(request(1), 0, 25, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(ValidationError::InvalidPage)));
}

#[tokio::test]
async fn test_manual_toggle_during_walk_is_kept() {
    let gate = Arc::new(Notify::new());
    let source = Arc::new(MemorySource::new(25, 12).gated_on(2, Arc::clone(&gate)));
    let (selector, selection) = selector(&source);
    let view = selection.clone();

    let walk = tokio::spawn(async move {
        selector
            .run(request(15), 1, 25, &CancellationToken::new())
            .await
    });

    wait_for_fetch(&source, 2).await;
    let page_one = source.ids_on_page(1);
    view.toggle(page_one[0], false);
    view.toggle(7, true);
    gate.notify_one();

    let outcome = walk.await.unwrap().unwrap();

    assert_eq!(outcome.taken.len(), 15);
    assert!(!selection.is_selected(page_one[0]));
    assert!(selection.is_selected(7));
    assert_eq!(selection.len(), 15);
}
