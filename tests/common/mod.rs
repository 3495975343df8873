//! Common test utilities and fixtures

use std::collections::VecDeque;
use std::sync::Mutex;

use gmail_category_cleanup::client::GmailClient;
use gmail_category_cleanup::config::DrainConfig;
use gmail_category_cleanup::error::Result;
use mockall::mock;

/// Generate `count` fake message ids with the given prefix
pub fn make_ids(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}-{:04}", prefix, i)).collect()
}

/// Drain settings for tests: default batch size, no inter-batch pause
pub fn test_drain_config() -> DrainConfig {
    DrainConfig {
        batch_size: 100,
        throttle_ms: 0,
    }
}

// Mock implementation of GmailClient for testing
mock! {
    pub GmailClient {}

    #[async_trait::async_trait]
    impl GmailClient for GmailClient {
        async fn search_message_ids(&self, query: &str, max_results: u32) -> Result<Vec<String>>;
        async fn batch_delete(&self, ids: &[String]) -> Result<()>;
    }
}

/// A canned client that serves a fixed sequence of list pages and accepts
/// every delete. Once the pages run out it keeps returning empty results,
/// which is how a drained category looks. Simpler than a mock when only the
/// page sequence matters.
pub struct ScriptedClient {
    pages: Mutex<VecDeque<Vec<String>>>,
    /// Sizes of the batches passed to `batch_delete`, in call order.
    pub deleted_batches: Mutex<Vec<usize>>,
    /// Every `max_results` value passed to `search_message_ids`.
    pub seen_max_results: Mutex<Vec<u32>>,
}

impl ScriptedClient {
    pub fn new(pages: Vec<Vec<String>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            deleted_batches: Mutex::new(Vec::new()),
            seen_max_results: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl GmailClient for ScriptedClient {
    async fn search_message_ids(&self, _query: &str, max_results: u32) -> Result<Vec<String>> {
        self.seen_max_results.lock().unwrap().push(max_results);
        Ok(self.pages.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn batch_delete(&self, ids: &[String]) -> Result<()> {
        assert!(!ids.is_empty(), "batch_delete called with no ids");
        self.deleted_batches.lock().unwrap().push(ids.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_ids() {
        let ids = make_ids("msg", 3);
        assert_eq!(ids, vec!["msg-0000", "msg-0001", "msg-0002"]);
    }

    #[tokio::test]
    async fn test_scripted_client_serves_pages_then_empties() {
        let client = ScriptedClient::new(vec![make_ids("a", 2)]);

        assert_eq!(
            client.search_message_ids("category:social", 100).await.unwrap().len(),
            2
        );
        assert!(client
            .search_message_ids("category:social", 100)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(*client.seen_max_results.lock().unwrap(), vec![100, 100]);
    }
}
