//! Gmail API client used by the category drain loop.

use async_trait::async_trait;
use google_gmail1::api::BatchDeleteMessagesRequest;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::{GmailHub, FULL_MAIL_SCOPE};
use crate::error::{GmailError, Result};

/// Trait defining Gmail client operations for easier testing
#[async_trait]
pub trait GmailClient: Send + Sync {
    /// List up to `max_results` message ids matching a query.
    ///
    /// Returns a single page. Callers that want more re-issue the query after
    /// acting on the page; the drain loop relies on this, since deleted
    /// messages stop matching on the next pass.
    async fn search_message_ids(&self, query: &str, max_results: u32) -> Result<Vec<String>>;

    /// Permanently delete the given messages in a single call.
    ///
    /// This bypasses the trash. Gmail treats the request as all-or-nothing:
    /// either every id is deleted or the call fails and none are.
    async fn batch_delete(&self, ids: &[String]) -> Result<()>;
}

/// Production Gmail client backed by the authenticated hub
pub struct ProductionGmailClient {
    hub: GmailHub,
}

impl ProductionGmailClient {
    pub fn new(hub: GmailHub) -> Self {
        Self { hub }
    }

    /// Email address of the authenticated account, when the API reports one
    pub async fn profile_email(&self) -> Result<Option<String>> {
        let (_, profile) = self
            .hub
            .users()
            .get_profile("me")
            .add_scope(FULL_MAIL_SCOPE)
            .doit()
            .await?;

        Ok(profile.email_address)
    }
}

#[async_trait]
impl GmailClient for ProductionGmailClient {
    async fn search_message_ids(&self, query: &str, max_results: u32) -> Result<Vec<String>> {
        // Wrap API call in timeout to prevent indefinite hangs
        let timeout_duration = Duration::from_secs(30);
        let api_call = async {
            debug!("Listing up to {} messages for query {:?}", max_results, query);
            self.hub
                .users()
                .messages_list("me")
                .q(query)
                .max_results(max_results)
                .add_scope(FULL_MAIL_SCOPE)
                .doit()
                .await
        };

        let (_, response) = match tokio::time::timeout(timeout_duration, api_call).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    "Gmail API messages.list call timed out after {:?}",
                    timeout_duration
                );
                return Err(GmailError::NetworkError(format!(
                    "API call timed out after {:?}",
                    timeout_duration
                )));
            }
        };

        let ids: Vec<String> = response
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|msg| msg.id)
            .collect();

        debug!("Query {:?} returned {} message ids", query, ids.len());
        Ok(ids)
    }

    async fn batch_delete(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let request = BatchDeleteMessagesRequest {
            ids: Some(ids.to_vec()),
        };

        let timeout_duration = Duration::from_secs(30);
        let api_call = async {
            debug!("Batch deleting {} messages", ids.len());
            self.hub
                .users()
                .messages_batch_delete(request, "me")
                .add_scope(FULL_MAIL_SCOPE)
                .doit()
                .await
        };

        match tokio::time::timeout(timeout_duration, api_call).await {
            Ok(result) => {
                result?;
            }
            Err(_) => {
                warn!(
                    "Gmail API batchDelete call timed out after {:?}",
                    timeout_duration
                );
                return Err(GmailError::NetworkError(format!(
                    "API call timed out after {:?}",
                    timeout_duration
                )));
            }
        }

        Ok(())
    }
}
