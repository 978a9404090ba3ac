//! Error types for the Cocorabot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for process-level failures (startup, serve).
///
/// Request-path failures never reach this type: `ProviderError` is handled
/// directly by the gateway's response mapping, and `KnowledgeError` degrades
/// to an empty store inside the knowledge crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures reported by the completion transport layer.
///
/// The transport classifies upstream failures into typed variants so callers
/// never have to inspect error message text to decide whether a retry makes
/// sense.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ProviderError {
    /// Whether waiting and retrying the same request could succeed.
    ///
    /// Only rate-limit/quota failures qualify; auth failures, malformed
    /// responses, and network errors propagate immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::RateLimited { .. })
    }
}

/// Failures while loading the knowledge store.
///
/// These are logged at startup and never fatal: a store that failed to load
/// behaves like an empty store.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}
