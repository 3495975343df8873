//! Gmail Category Cleanup
//!
//! A small destructive tool that empties Gmail's Social, Promotions and
//! Updates tabs by repeatedly listing and batch-deleting messages until each
//! category reports no more matches. Deletions bypass the trash and cannot
//! be undone.
//!
//! # Overview
//!
//! The run is linear:
//! - **Authentication**: OAuth2 consent flow with full mailbox scope; any
//!   cached token is discarded first so stale scopes never leak into a run
//! - **Draining**: per category, list up to a batch of message ids, batch
//!   delete them, pause briefly, repeat until a query comes back empty
//! - **Driver**: drains the fixed category list in order, carrying on past
//!   per-category failures and reporting each category's final count
//!
//! # Example Usage
//!
//! ```no_run
//! use gmail_category_cleanup::{auth, cli, client::ProductionGmailClient, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = Config::load("cleanup.toml".as_ref()).await?;
//!
//!     // Authenticate (discards any cached token first)
//!     let hub = auth::initialize_gmail_hub(
//!         "credentials.json".as_ref(),
//!         "token.json".as_ref()
//!     ).await?;
//!
//!     let client = ProductionGmailClient::new(hub);
//!     let reporter = cli::ProgressReporter::new();
//!
//!     let report = cli::run_cleanup(&client, &config.drain, &reporter).await;
//!     println!("Deleted {} messages", report.total_deleted());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`auth`] - OAuth2 authentication and Gmail API initialization
//! - [`cli`] - Command-line interface and the cleanup run driver
//! - [`client`] - Gmail API client (category search and batch delete)
//! - [`config`] - Configuration management
//! - [`drainer`] - The per-category drain loop
//! - [`error`] - Error types and result aliases
//! - [`models`] - Core data structures

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod drainer;
pub mod error;
pub mod models;

// Re-export commonly used types for convenience
pub use error::{GmailError, Result};

// Core data models
pub use models::{Category, DrainOutcome, DrainSummary};

// Config types
pub use config::{Config, DrainConfig};

// Client traits
pub use client::{GmailClient, ProductionGmailClient};

// Drain loop
pub use drainer::{drain_category, drain_category_with_progress, BatchProgressCallback};

// CLI types (for binary usage)
pub use cli::{run_cleanup, CleanupReport, Cli, ProgressReporter, CLEANUP_CATEGORIES};
