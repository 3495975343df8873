//! OAuth2 authentication management for the Gmail API.
//!
//! Every run starts from a clean slate: the on-disk token cache is discarded
//! before the authenticator is built, so the consent prompt always grants the
//! scopes this build asks for rather than whatever an older run cached.

use google_gmail1::{hyper_rustls, hyper_util, yup_oauth2, Gmail};
use std::path::Path;

use crate::error::{GmailError, Result};

/// Full Gmail access scope.
///
/// `users.messages.batchDelete` rejects tokens issued with the narrower
/// modify/readonly scopes, so the tool has to ask for full mailbox access.
pub const FULL_MAIL_SCOPE: &str = "https://mail.google.com/";

/// Scopes requested during the OAuth2 consent flow.
pub const REQUIRED_SCOPES: &[&str] = &[FULL_MAIL_SCOPE];

/// Type alias for Gmail Hub to simplify type signatures
pub type GmailHub = Gmail<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>>;

/// Remove the token cache left behind by a previous run.
///
/// A cached token carries the scopes it was originally granted, and
/// yup-oauth2 serves it back even when the current run requires more. Earlier
/// releases of this tool requested narrower scopes, so a stale cache produces
/// 403s on every batch delete. Discarding it forces a fresh consent prompt.
///
/// # Returns
/// `true` if a cache file existed and was removed, `false` if there was
/// nothing to remove
pub async fn purge_cached_token(token_cache_path: &Path) -> Result<bool> {
    match tokio::fs::remove_file(token_cache_path).await {
        Ok(()) => {
            tracing::info!("Removed cached token at {:?}", token_cache_path);
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No cached token at {:?}", token_cache_path);
            Ok(false)
        }
        Err(e) => Err(GmailError::AuthError(format!(
            "Failed to remove cached token at {:?}: {}",
            token_cache_path, e
        ))),
    }
}

/// Initialize Gmail API hub with OAuth2 authentication
///
/// This function sets up the complete Gmail API client with:
/// - An unconditional purge of the cached token (see [`purge_cached_token`])
/// - OAuth2 authentication using InstalledFlow (desktop app flow)
/// - Token persistence to disk for refresh within the run
/// - HTTP/1 client with TLS support
///
/// # Arguments
/// * `credentials_path` - Path to the OAuth2 credentials JSON file
/// * `token_cache_path` - Path where the access token will be cached
///
/// # Returns
/// A configured Gmail hub ready for API calls
pub async fn initialize_gmail_hub(
    credentials_path: &Path,
    token_cache_path: &Path,
) -> Result<GmailHub> {
    purge_cached_token(token_cache_path).await?;

    // Read OAuth2 credentials
    let secret = yup_oauth2::read_application_secret(credentials_path)
        .await
        .map_err(|e| GmailError::AuthError(format!("Failed to read credentials: {}", e)))?;

    // Build authenticator with token persistence
    // HTTPRedirect opens a browser for user authorization
    let auth = yup_oauth2::InstalledFlowAuthenticator::builder(
        secret,
        yup_oauth2::InstalledFlowReturnMethod::HTTPRedirect,
    )
    .persist_tokens_to_disk(token_cache_path)
    .build()
    .await
    .map_err(|e| GmailError::AuthError(format!("Failed to build authenticator: {}", e)))?;

    // Obtain the token now so the consent prompt happens before any mailbox
    // work starts, not in the middle of a drain
    let _token = auth
        .token(REQUIRED_SCOPES)
        .await
        .map_err(|e| GmailError::AuthError(format!("Failed to obtain token: {}", e)))?;

    if token_cache_path.exists() {
        secure_token_file(token_cache_path).await?;
    }

    // Configure HTTP client with TLS
    // Use HTTP/1 for compatibility (HTTP/2 is default but HTTP/1 works better with google-gmail1)
    let client = hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
        .build(
            hyper_rustls::HttpsConnectorBuilder::new()
                .with_native_roots()
                .map_err(|e| {
                    GmailError::AuthError(format!("Failed to load TLS roots: {}", e))
                })?
                .https_or_http()
                .enable_http1()
                .build(),
        );

    Ok(Gmail::new(client, auth))
}

/// Secure token file permissions on Unix systems
///
/// Sets file permissions to 0600 (read/write for owner only)
/// to prevent unauthorized access to OAuth2 tokens
#[cfg(unix)]
pub async fn secure_token_file(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o600); // Read/write for owner only
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// Secure token file on Windows (stub implementation)
///
/// Windows uses ACLs instead of Unix permissions
/// In production, should use win32 APIs to set appropriate ACLs
#[cfg(windows)]
pub async fn secure_token_file(_path: &Path) -> Result<()> {
    // Windows uses ACLs, file permissions are different
    // In production, use win32 APIs to set appropriate ACLs
    Ok(())
}
