//! Tests for the full cleanup run
//!
//! The driver has one job: drain every category in its fixed order, exactly
//! once, whether or not earlier categories failed.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use common::{make_ids, test_drain_config, MockGmailClient};
use gmail_category_cleanup::cli::{run_cleanup, ProgressReporter, CLEANUP_CATEGORIES};
use gmail_category_cleanup::error::GmailError;
use gmail_category_cleanup::models::Category;

#[tokio::test]
async fn test_run_visits_every_category_in_order() {
    let queries = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&queries);

    let mut mock = MockGmailClient::new();
    mock.expect_search_message_ids()
        .times(3)
        .returning(move |query, _| {
            sink.lock().unwrap().push(query.to_string());
            Ok(vec![])
        });
    mock.expect_batch_delete().times(0);

    let reporter = ProgressReporter::new();
    let report = run_cleanup(&mock, &test_drain_config(), &reporter).await;

    assert_eq!(
        *queries.lock().unwrap(),
        vec!["category:social", "category:promotions", "category:updates"]
    );
    assert_eq!(report.summaries.len(), 3);
    assert!(report.all_drained());
    assert_eq!(report.total_deleted(), 0);
    assert!(!report.run_id.is_empty());
}

#[tokio::test]
async fn test_run_continues_after_a_category_fails() {
    // SOCIAL deletes one batch of 50 and then hits a network error on the
    // second delete. Its summary reports the 50 that landed, and the other
    // two categories still get drained.
    let mut mock = MockGmailClient::new();
    mock.expect_search_message_ids().returning(|query, _| {
        if query == "category:social" {
            Ok(make_ids("social", 50))
        } else {
            Ok(vec![])
        }
    });

    let delete_calls = Arc::new(AtomicUsize::new(0));
    let deletes = Arc::clone(&delete_calls);
    mock.expect_batch_delete().returning(move |_| {
        if deletes.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(())
        } else {
            Err(GmailError::NetworkError("connection reset".to_string()))
        }
    });

    let reporter = ProgressReporter::new();
    let report = run_cleanup(&mock, &test_drain_config(), &reporter).await;

    assert_eq!(report.summaries.len(), 3);

    let social = &report.summaries[0];
    assert_eq!(social.category, Category::Social);
    assert_eq!(social.messages_deleted, 50);
    assert!(!social.is_drained());

    assert_eq!(report.summaries[1].category, Category::Promotions);
    assert!(report.summaries[1].is_drained());
    assert_eq!(report.summaries[2].category, Category::Updates);
    assert!(report.summaries[2].is_drained());

    assert_eq!(report.total_deleted(), 50);
    assert_eq!(report.categories_drained(), 2);
    assert!(!report.all_drained());
}

#[tokio::test]
async fn test_run_survives_every_category_failing() {
    let mut mock = MockGmailClient::new();
    mock.expect_search_message_ids()
        .times(3)
        .returning(|_, _| Err(GmailError::AuthError("token revoked mid-run".to_string())));
    mock.expect_batch_delete().times(0);

    let reporter = ProgressReporter::new();
    let report = run_cleanup(&mock, &test_drain_config(), &reporter).await;

    assert_eq!(report.summaries.len(), CLEANUP_CATEGORIES.len());
    assert_eq!(report.categories_drained(), 0);
    assert_eq!(report.total_deleted(), 0);
    assert!(!report.all_drained());
}
