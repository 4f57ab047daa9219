//! UX Backend Server

use super::handlers::{router, HandlerState};
use crate::error::{Error, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub const DEFAULT_TOKEN_LIFETIME_HOURS: u32 = 48;
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "/etc/private-key/key";

// =============================================================================
// Server Configuration
// =============================================================================

/// Configuration for the UX backend
#[derive(Debug, Clone)]
pub struct UxBackendConfig {
    /// Bind address
    pub listen_addr: SocketAddr,
    /// Lifetime of issued onboarding tokens
    pub token_lifetime_hours: u32,
    /// PEM RSA private key used to sign tokens
    pub private_key_path: PathBuf,
}

impl Default for UxBackendConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            token_lifetime_hours: DEFAULT_TOKEN_LIFETIME_HOURS,
            private_key_path: PathBuf::from(DEFAULT_PRIVATE_KEY_PATH),
        }
    }
}

// =============================================================================
// UX Backend Server
// =============================================================================

pub struct UxBackendServer {
    config: UxBackendConfig,
}

impl UxBackendServer {
    pub fn new(config: UxBackendConfig) -> Self {
        Self { config }
    }

    /// Build the router without binding
    pub fn app(&self) -> axum::Router {
        router(Arc::new(HandlerState {
            token_lifetime_hours: self.config.token_lifetime_hours,
            private_key_path: self.config.private_key_path.clone(),
        }))
    }

    /// Serve until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let app = self.app();
        let addr = self.config.listen_addr;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Internal(format!("Failed to bind UX backend: {}", e)))?;

        info!(
            addr = %addr,
            token_lifetime_hours = self.config.token_lifetime_hours,
            private_key_path = %self.config.private_key_path.display(),
            "UX backend listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                info!("UX backend shutting down");
            })
            .await
            .map_err(|e| Error::Internal(format!("UX backend error: {}", e)))?;

        Ok(())
    }
}
