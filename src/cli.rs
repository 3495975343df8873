//! Command-line interface and the cleanup run itself

use chrono::Utc;
use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::client::GmailClient;
use crate::config::DrainConfig;
use crate::drainer;
use crate::models::{Category, DrainSummary};

/// Category tabs this tool empties, in drain order.
///
/// The list is fixed on purpose: Primary and Forums tend to hold mail people
/// still want, while these three tabs are where bulk mail piles up. Changing
/// the set means changing this constant, not passing a flag.
pub const CLEANUP_CATEGORIES: [Category; 3] =
    [Category::Social, Category::Promotions, Category::Updates];

#[derive(Parser, Debug)]
#[command(name = "gmail-category-cleanup")]
#[command(version)]
#[command(
    about = "Permanently deletes everything in Gmail's Social, Promotions and Updates tabs",
    long_about = None
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "cleanup.toml")]
    pub config: PathBuf,

    /// Path to OAuth2 credentials file
    #[arg(long, default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// Path to token cache file (discarded and recreated on every run)
    #[arg(long, default_value = "token.json")]
    pub token_cache: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Progress reporter using indicatif
pub struct ProgressReporter {
    multi: MultiProgress,
    spinner_style: ProgressStyle,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_multi_progress(MultiProgress::new())
    }

    /// Build a reporter on an existing `MultiProgress` so log lines routed
    /// through it interleave cleanly with the spinners.
    pub fn with_multi_progress(multi: MultiProgress) -> Self {
        // Use {elapsed} for human-readable format (e.g., "1s", "234ms")
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed:>6}] {msg}")
            .unwrap()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");

        Self {
            multi,
            spinner_style,
        }
    }

    pub fn add_spinner(&self, msg: &str) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(self.spinner_style.clone());
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Finish a spinner and clear it from the multi-progress display
    pub fn finish_spinner(&self, pb: &ProgressBar, msg: &str) {
        pb.finish_and_clear();
        println!("  ✓ {}", msg);
    }

    /// Clear a spinner whose operation stopped on an error
    pub fn fail_spinner(&self, pb: &ProgressBar, msg: &str) {
        pb.finish_and_clear();
        println!("  ✗ {}", msg);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a full cleanup run, one summary per category
#[derive(Debug)]
pub struct CleanupReport {
    pub run_id: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: chrono::DateTime<chrono::Utc>,
    pub duration_seconds: i64,
    pub summaries: Vec<DrainSummary>,
}

impl CleanupReport {
    /// Total messages deleted across all categories
    pub fn total_deleted(&self) -> usize {
        self.summaries.iter().map(|s| s.messages_deleted).sum()
    }

    /// Number of categories that drained to empty
    pub fn categories_drained(&self) -> usize {
        self.summaries.iter().filter(|s| s.is_drained()).count()
    }

    /// True when every category drained without an error
    pub fn all_drained(&self) -> bool {
        self.summaries.iter().all(|s| s.is_drained())
    }
}

/// Drain every category in [`CLEANUP_CATEGORIES`], in order.
///
/// A failure stops only the category it happened in; the run always moves on
/// to the next category and the report records how far each one got.
///
/// # Arguments
/// * `client` - Authenticated Gmail client, shared across categories
/// * `config` - Batch size and inter-batch pause
/// * `reporter` - Progress display for per-category spinners
///
/// # Returns
/// A report with one [`DrainSummary`] per category, in drain order
pub async fn run_cleanup<C: GmailClient>(
    client: &C,
    config: &DrainConfig,
    reporter: &ProgressReporter,
) -> CleanupReport {
    let run_id = uuid::Uuid::new_v4().to_string();
    let started_at = Utc::now();
    let mut summaries = Vec::with_capacity(CLEANUP_CATEGORIES.len());

    info!("Starting cleanup run: {}", run_id);

    for category in CLEANUP_CATEGORIES {
        info!("Processing {} category", category);

        let spinner = reporter.add_spinner(&format!("{}: deleting...", category));
        let spinner_updates = spinner.clone();

        let on_batch: drainer::BatchProgressCallback = Arc::new(move |_, total_deleted| {
            spinner_updates.set_message(format!("{}: {} deleted so far", category, total_deleted));
        });

        let summary =
            drainer::drain_category_with_progress(client, category, config, on_batch).await;

        if summary.is_drained() {
            reporter.finish_spinner(&spinner, &summary.status_line());
        } else {
            reporter.fail_spinner(&spinner, &summary.status_line());
        }

        summaries.push(summary);
    }

    let completed_at = Utc::now();
    CleanupReport {
        run_id,
        started_at,
        completed_at,
        duration_seconds: (completed_at - started_at).num_seconds(),
        summaries,
    }
}
