//! OCS Exporter - Pool Mirroring Metrics and UX Backend
//!
//! Exposes the RBD mirroring state of Rook CephBlockPools and their rados
//! namespaces as Prometheus gauges, and serves the console's onboarding
//! endpoints.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ocs-metrics-exporter                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌────────────────────┐   │
//! │  │  CacheWatcher    │──▶│  ResourceCache   │──▶│ CephBlockPool      │   │
//! │  │  (watch + retry) │   │  (reflector)     │   │ Collector          │   │
//! │  └──────────────────┘   └──────────────────┘   └─────────┬──────────┘   │
//! │                                                          │              │
//! │                                              ┌───────────┴──────────┐   │
//! │                                              │ Registry → /metrics  │   │
//! │                                              └──────────────────────┘   │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                            ux-backend                                   │
//! │  ┌──────────────────────────┐   ┌───────────────────────────────────┐   │
//! │  │  POST /onboarding-tokens │   │  POST /info/deployment            │   │
//! │  │  (RSA-PSS signed ticket) │   │  (capability flags)               │   │
//! │  └──────────────────────────┘   └───────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: Watch-populated resource caches
//! - [`crd`]: Rook custom resources read by the exporter
//! - [`domain`]: Ports between caches and the collector
//! - [`metrics`]: Collector, metric descriptors and the metrics server
//! - [`uxbackend`]: Onboarding token and deployment capability endpoints
//! - [`logging`]: Subscriber setup shared by the binaries
//! - [`error`]: Error types and handling

pub mod cache;
pub mod crd;
pub mod domain;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod uxbackend;

// Re-export commonly used types
pub use cache::{watch_api, watched_cache, CacheWatcher, ResourceCache};

pub use crd::{
    CephBlockPool, CephBlockPoolRadosNamespace, CephBlockPoolSpec, CephBlockPoolStatus,
    ImageHealth, MirroringStatusSpec, RadosNamespaceMirroringMode,
};

pub use domain::ports::{ListScope, MirroredResource, ResourceLister};

pub use error::{Error, Result};

pub use metrics::{
    CephBlockPoolCollector, CollectorConfig, MetricsServer, MetricsServerConfig,
    DEFAULT_EXPORTER_NAMESPACE,
};

pub use uxbackend::{UxBackendConfig, UxBackendServer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
