//! Drain loop that empties one Gmail category tab.
//!
//! The loop is deliberately naive: list a page of ids, batch delete them,
//! pause, repeat until a query comes back empty. Deleted messages stop
//! matching the category query, so no page token bookkeeping is needed.
//! Errors are not retried; the first failure stops the category and the
//! count so far is reported.

use std::sync::Arc;
use tracing::{info, warn};

use crate::client::GmailClient;
use crate::config::DrainConfig;
use crate::models::{Category, DrainOutcome, DrainSummary};

/// Callback invoked after each successful batch with the batch size and the
/// running total for the category.
pub type BatchProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Delete every message in `category`, one batch at a time.
///
/// # Arguments
/// * `client` - Gmail client to query and delete through
/// * `category` - Category tab to empty
/// * `config` - Batch size and inter-batch pause
///
/// # Returns
/// A summary of how far the drain got. The summary carries the error when
/// the drain stopped early; counts always reflect completed deletions only.
pub async fn drain_category<C: GmailClient>(
    client: &C,
    category: Category,
    config: &DrainConfig,
) -> DrainSummary {
    drain_category_with_progress(client, category, config, Arc::new(|_, _| {})).await
}

/// [`drain_category`] variant that reports per-batch progress.
///
/// The callback fires once per successful batch, after the deletions have
/// been counted and before the inter-batch pause.
pub async fn drain_category_with_progress<C: GmailClient>(
    client: &C,
    category: Category,
    config: &DrainConfig,
    on_batch: BatchProgressCallback,
) -> DrainSummary {
    let query = category.query();
    let mut messages_deleted = 0usize;
    let mut batches_deleted = 0usize;

    loop {
        let ids = match client.search_message_ids(&query, config.batch_size).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(
                    "Stopping {} drain after {} deletions: listing failed: {}",
                    category, messages_deleted, e
                );
                return DrainSummary {
                    category,
                    messages_deleted,
                    batches_deleted,
                    outcome: DrainOutcome::Aborted(e),
                };
            }
        };

        if ids.is_empty() {
            info!("No more messages found in {} category", category);
            break;
        }

        info!("Found {} messages in {} category", ids.len(), category);

        if let Err(e) = client.batch_delete(&ids).await {
            warn!(
                "Stopping {} drain after {} deletions: batch delete failed: {}",
                category, messages_deleted, e
            );
            return DrainSummary {
                category,
                messages_deleted,
                batches_deleted,
                outcome: DrainOutcome::Aborted(e),
            };
        }

        messages_deleted += ids.len();
        batches_deleted += 1;

        info!(
            "Deleted batch of {} messages. Total deleted so far: {}",
            ids.len(),
            messages_deleted
        );

        on_batch(ids.len(), messages_deleted);

        // Fixed pause so back-to-back batch deletes stay under the per-user
        // write quota.
        tokio::time::sleep(config.throttle()).await;
    }

    DrainSummary {
        category,
        messages_deleted,
        batches_deleted,
        outcome: DrainOutcome::Drained,
    }
}
