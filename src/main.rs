//! OCS Metrics Exporter
//!
//! Watches Rook CephBlockPools and CephBlockPoolRadosNamespaces and serves
//! their mirroring state as Prometheus gauges.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  CacheWatcher<CephBlockPool>      CacheWatcher<...RadosNamespace>  │
//! │            │                                  │                    │
//! │            ▼                                  ▼                    │
//! │  ResourceCache<CephBlockPool>     ResourceCache<...RadosNamespace> │
//! │            └───────────────┬──────────────────┘                    │
//! │                            ▼                                       │
//! │                 CephBlockPoolCollector                             │
//! │                            │                                       │
//! │                            ▼                                       │
//! │          Registry ── /metrics  /healthz  /readyz                   │
//! └────────────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use kube::Client;
use prometheus::Registry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use ocs_exporter::metrics::ReadinessCheck;
use ocs_exporter::{
    logging, watch_api, watched_cache, CephBlockPool, CephBlockPoolCollector,
    CephBlockPoolRadosNamespace, CollectorConfig, Error, MetricsServer, MetricsServerConfig,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// OCS Metrics Exporter - pool mirroring metrics for Ceph block pools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Metrics server bind address
    #[arg(long, env = "METRICS_ADDR", default_value = "0.0.0.0:8080")]
    metrics_addr: String,

    /// Prefix of the exported metric names
    #[arg(long, env = "EXPORTER_NAMESPACE", default_value = "ocs")]
    exporter_namespace: String,

    /// Namespaces to report on (comma-separated, empty for all)
    #[arg(long, env = "ALLOWED_NAMESPACES", value_delimiter = ',')]
    allowed_namespaces: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init_logging(&args.log_level, args.log_json)?;

    let config = CollectorConfig::new(&args.exporter_namespace, &args.allowed_namespaces);
    let addr: SocketAddr = args
        .metrics_addr
        .parse()
        .map_err(|e| Error::Configuration(format!("Invalid metrics address: {}", e)))?;

    info!("Starting OCS Metrics Exporter");
    info!("  Version: {}", ocs_exporter::VERSION);
    info!("  Metrics: {}", addr);
    info!("  Exporter namespace: {}", config.exporter_namespace);
    if config.allowed_namespaces.is_empty() {
        info!("  Allowed namespaces: all");
    } else {
        info!("  Allowed namespaces: {}", config.allowed_namespaces.join(","));
    }

    let client = Client::try_default().await?;
    let shutdown = CancellationToken::new();

    // Start cache watchers
    let (pools, pool_watcher) =
        watched_cache(watch_api::<CephBlockPool>(client.clone(), &config.allowed_namespaces));
    let (rados_namespaces, rados_namespace_watcher) = watched_cache(
        watch_api::<CephBlockPoolRadosNamespace>(client, &config.allowed_namespaces),
    );
    let pools = Arc::new(pools);
    let rados_namespaces = Arc::new(rados_namespaces);

    let watchers = [
        tokio::spawn(pool_watcher.run(shutdown.clone())),
        tokio::spawn(rados_namespace_watcher.run(shutdown.clone())),
    ];

    // Register the collector
    let collector = CephBlockPoolCollector::new(&config, pools.clone(), rados_namespaces.clone())?;
    let registry = Registry::new();
    registry.register(Box::new(collector))?;

    let readiness: ReadinessCheck = Arc::new(move || pools.is_synced() && rados_namespaces.is_synced());
    let server = MetricsServer::new(MetricsServerConfig { addr }, registry).with_readiness(readiness);

    // Cancel everything on Ctrl-C
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

    let served = server.run(shutdown.clone()).await;

    shutdown.cancel();
    for watcher in watchers {
        if let Err(e) = watcher.await {
            error!(error = %e, "Cache watcher task failed");
        }
    }

    served?;
    info!("Exporter shutdown complete");
    Ok(())
}
