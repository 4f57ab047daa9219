//! UX Backend
//!
//! Serves the console's onboarding token and deployment capability
//! endpoints.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use ocs_exporter::uxbackend::{DEFAULT_PRIVATE_KEY_PATH, DEFAULT_TOKEN_LIFETIME_HOURS};
use ocs_exporter::{logging, Error, UxBackendConfig, UxBackendServer};

/// UX Backend - onboarding endpoints for the storage console
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bind address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    listen_addr: String,

    /// Lifetime of issued onboarding tokens in hours
    #[arg(long, env = "ONBOARDING_TOKEN_LIFETIME", default_value_t = DEFAULT_TOKEN_LIFETIME_HOURS)]
    token_lifetime_hours: u32,

    /// PEM RSA private key used to sign onboarding tokens
    #[arg(long, env = "ONBOARDING_PRIVATE_KEY_PATH", default_value = DEFAULT_PRIVATE_KEY_PATH)]
    private_key_path: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init_logging(&args.log_level, args.log_json)?;

    let listen_addr: SocketAddr = args
        .listen_addr
        .parse()
        .map_err(|e| Error::Configuration(format!("Invalid listen address: {}", e)))?;

    info!("Starting UX Backend");
    info!("  Version: {}", ocs_exporter::VERSION);

    let server = UxBackendServer::new(UxBackendConfig {
        listen_addr,
        token_lifetime_hours: args.token_lifetime_hours,
        private_key_path: args.private_key_path,
    });

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal");
                signal_token.cancel();
            }
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
    });

    server.run(shutdown).await?;
    info!("UX backend shutdown complete");
    Ok(())
}
