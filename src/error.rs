//! Error types for the OCS exporter
//!
//! Provides structured error types for the metrics collector, the
//! watch-backed resource caches, and the UX backend services.

use thiserror::Error;

/// Unified error type for the exporter
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Kubernetes Errors
    // =========================================================================
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Cache for {kind} has not completed its initial sync")]
    CacheNotSynced { kind: String },

    #[error("Failed to list {kind} in namespace {namespace}: {reason}")]
    ListFailed {
        kind: String,
        namespace: String,
        reason: String,
    },

    // =========================================================================
    // Metrics Errors
    // =========================================================================
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    // =========================================================================
    // Onboarding Token Errors
    // =========================================================================
    #[error("Invalid quota value sent in request body: {0}")]
    InvalidQuota(String),

    #[error("Failed to load signing key {path}: {reason}")]
    SigningKey { path: String, reason: String },

    #[error("Token signing failed: {0}")]
    Signing(#[from] openssl::error::ErrorStack),

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error is transient
    ///
    /// Transient errors are expected to clear on their own, e.g. a cache
    /// that is still performing its initial list.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Kube(_) | Error::CacheNotSynced { .. } | Error::ListFailed { .. } | Error::Io(_)
        )
    }
}

/// Result type alias for the exporter
pub type Result<T> = std::result::Result<T, Error>;
