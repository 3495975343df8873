use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GmailError;

/// Gmail tab categories addressable through the `category:` search operator.
///
/// Gmail assigns every inbox message to exactly one of these buckets; the
/// assignment is provider-defined and opaque to this tool, which only ever
/// uses the bucket as a search filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Primary,
    Social,
    Promotions,
    Updates,
    Forums,
}

impl Category {
    /// Value accepted by the `category:` search operator.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Category::Primary => "primary",
            Category::Social => "social",
            Category::Promotions => "promotions",
            Category::Updates => "updates",
            Category::Forums => "forums",
        }
    }

    /// Full search query matching every message in this category.
    pub fn query(&self) -> String {
        format!("category:{}", self.as_query_value())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Primary => "PRIMARY",
            Category::Social => "SOCIAL",
            Category::Promotions => "PROMOTIONS",
            Category::Updates => "UPDATES",
            Category::Forums => "FORUMS",
        };
        write!(f, "{}", name)
    }
}

/// How a category drain ended.
#[derive(Debug)]
pub enum DrainOutcome {
    /// A query came back empty; the category holds no more matching messages.
    Drained,
    /// A list or delete call failed. The tally covers only the batches
    /// deleted before the failure; the error was not retried.
    Aborted(GmailError),
}

/// Per-category result of a drain run.
///
/// The tally is the only record of what was deleted; the messages themselves
/// are gone (batchDelete bypasses the trash).
#[derive(Debug)]
pub struct DrainSummary {
    pub category: Category,
    pub messages_deleted: usize,
    pub batches_deleted: usize,
    pub outcome: DrainOutcome,
}

impl DrainSummary {
    /// True when the category was emptied rather than aborted.
    pub fn is_drained(&self) -> bool {
        matches!(self.outcome, DrainOutcome::Drained)
    }

    /// One operator-facing line for the run summary block.
    pub fn status_line(&self) -> String {
        match &self.outcome {
            DrainOutcome::Drained => format!(
                "{}: {} messages deleted in {} batches",
                self.category, self.messages_deleted, self.batches_deleted
            ),
            DrainOutcome::Aborted(e) => format!(
                "{}: aborted after {} messages ({})",
                self.category, self.messages_deleted, e
            ),
        }
    }
}
