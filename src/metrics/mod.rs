//! Pool Mirroring Metrics
//!
//! Projects the cached Rook pool resources onto two gauges on every scrape.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                       CephBlockPoolCollector                        │
//! ├────────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐   ┌──────────────────┐   ┌────────────────────┐  │
//! │  │  Enumerator  │──▶│    Projectors    │──▶│ MetricDescriptors  │  │
//! │  │ (per-ns list)│   │ (health, status) │   │ (encode families)  │  │
//! │  └──────┬───────┘   └──────────────────┘   └────────────────────┘  │
//! │         │                                                          │
//! │  ┌──────┴─────────────────────────────┐                            │
//! │  │ ResourceLister<CephBlockPool>      │                            │
//! │  │ ResourceLister<...RadosNamespace>  │                            │
//! │  └────────────────────────────────────┘                            │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exported series:
//! - `<ns>_pool_mirroring_image_health{name, namespace, rados_namespace}`:
//!   0=OK, 1=UNKNOWN, 2=WARNING, 3=ERROR
//! - `<ns>_pool_mirroring_status{name, namespace, rados_namespace}`:
//!   0=Disabled, 1=Enabled

pub mod collector;
pub mod descriptors;
pub mod enumerator;
pub mod projector;
pub mod sample;
pub mod server;

pub use collector::{CephBlockPoolCollector, CollectorConfig, DEFAULT_EXPORTER_NAMESPACE};
pub use descriptors::{MetricDescriptor, MetricDescriptors};
pub use enumerator::enumerate;
pub use projector::{project_image_health, project_status};
pub use sample::{MetricSample, MirroringMetric, SampleLabels, LABEL_NAMES};
pub use server::{render, MetricsServer, MetricsServerConfig, ReadinessCheck};
