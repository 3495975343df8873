use anyhow::Result;
use clap::Parser;
use gmail_category_cleanup::auth;
use gmail_category_cleanup::cli::{self, Cli, ProgressReporter};
use gmail_category_cleanup::client::ProductionGmailClient;
use gmail_category_cleanup::config::Config;
use gmail_category_cleanup::error::GmailError;
use indicatif::MultiProgress;
use std::io::Write;
use std::process;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// A writer that prints through MultiProgress to avoid progress bar conflicts
struct MultiProgressWriter {
    multi: Arc<MultiProgress>,
    buffer: Vec<u8>,
}

impl MultiProgressWriter {
    fn new(multi: Arc<MultiProgress>) -> Self {
        Self {
            multi,
            buffer: Vec::new(),
        }
    }
}

impl Write for MultiProgressWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.buffer.is_empty() {
            let msg = String::from_utf8_lossy(&self.buffer);
            // Remove trailing newline for cleaner output
            let msg = msg.trim_end_matches('\n');
            if !msg.is_empty() {
                let _ = self.multi.println(msg);
            }
            self.buffer.clear();
        }
        Ok(())
    }
}

impl Drop for MultiProgressWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// MakeWriter implementation for tracing
#[derive(Clone)]
struct MultiProgressMakeWriter {
    multi: Arc<MultiProgress>,
}

impl MultiProgressMakeWriter {
    fn new(multi: Arc<MultiProgress>) -> Self {
        Self { multi }
    }
}

impl<'a> MakeWriter<'a> for MultiProgressMakeWriter {
    type Writer = MultiProgressWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MultiProgressWriter::new(Arc::clone(&self.multi))
    }
}

#[tokio::main]
async fn main() {
    // Exit with proper code on error
    if let Err(e) = run().await {
        display_error(&e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Install default crypto provider for rustls
    // This is necessary because multiple dependencies use different crypto providers
    // On non-Windows platforms, use aws-lc-rs (better performance, FIPS support)
    // On Windows, use ring (better compatibility, no NASM/CMake required)
    #[cfg(not(windows))]
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install default crypto provider"))?;

    #[cfg(windows)]
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install default crypto provider"))?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing with level based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("gmail_category_cleanup=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("gmail_category_cleanup=info,warn,error"))
    };

    // Create shared MultiProgress for coordinated progress bar + logging
    let multi_progress = Arc::new(MultiProgress::new());
    let make_writer = MultiProgressMakeWriter::new(Arc::clone(&multi_progress));

    // Set up tracing with MultiProgress writer - logs will print above progress bars
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(make_writer)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    tracing::info!("Starting Gmail cleanup process...");
    println!("This permanently deletes ALL mail in the Social, Promotions and Updates tabs.");

    let reporter = ProgressReporter::with_multi_progress((*multi_progress).clone());

    // Load configuration
    let config_spinner = reporter.add_spinner("Loading configuration...");
    let config = Config::load(&cli.config).await?;
    reporter.finish_spinner(
        &config_spinner,
        &format!(
            "Configuration ready ({} messages per batch)",
            config.drain.batch_size
        ),
    );

    // Ensure the token cache directory exists before the flow writes to it
    if let Some(parent) = cli.token_cache.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    // Authenticate. The cached token is discarded first, so every run goes
    // through a fresh consent prompt with the full-mail scope.
    let auth_spinner = reporter.add_spinner("Authenticating with Gmail API...");
    let hub = auth::initialize_gmail_hub(&cli.credentials, &cli.token_cache).await?;
    let client = ProductionGmailClient::new(hub);

    match client.profile_email().await? {
        Some(email) => {
            reporter.finish_spinner(&auth_spinner, &format!("Authenticated as {}", email))
        }
        None => reporter.finish_spinner(&auth_spinner, "Gmail API authenticated successfully"),
    }

    let report = cli::run_cleanup(&client, &config.drain, &reporter).await;

    // Display summary
    println!("\n========================================");
    println!("Cleanup Run Summary");
    println!("========================================");
    println!("Run ID: {}", report.run_id);
    for summary in &report.summaries {
        println!("{}", summary.status_line());
    }
    println!("----------------------------------------");
    println!("Total deleted: {}", report.total_deleted());
    println!(
        "Categories drained: {}/{}",
        report.categories_drained(),
        report.summaries.len()
    );
    println!("Duration: {} seconds", report.duration_seconds);
    println!("========================================");

    if report.all_drained() {
        tracing::info!("Cleanup process completed");
    } else {
        tracing::warn!("Cleanup process completed with errors; see the summary above");
    }

    Ok(())
}

/// Display error with context
fn display_error(error: &anyhow::Error) {
    eprintln!("Error: {}", error);

    // Display error chain
    let mut cause = error.source();
    while let Some(e) = cause {
        eprintln!("  Caused by: {}", e);
        cause = e.source();
    }

    // Display helpful hints based on error type
    if let Some(gmail_err) = error.downcast_ref::<GmailError>() {
        match gmail_err {
            GmailError::AuthError(_) => {
                eprintln!("\nHint: Make sure your credentials.json file is valid.");
                eprintln!("      You can download it from Google Cloud Console.");
            }
            GmailError::Forbidden(_) => {
                eprintln!("\nHint: The granted token does not permit permanent deletion.");
                eprintln!("      Re-run the tool and accept the full mailbox access prompt.");
            }
            GmailError::RateLimitExceeded { retry_after } => {
                eprintln!("\nHint: You've hit Gmail API rate limits.");
                eprintln!("      Wait {} seconds and run the tool again.", retry_after);
            }
            GmailError::ConfigError(_) => {
                eprintln!("\nHint: Check your configuration file for errors.");
            }
            _ => {}
        }
    }
}
