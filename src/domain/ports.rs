//! Domain Ports - Core trait definitions for the exporter
//!
//! These traits define the boundary between the metric projection logic and
//! the cluster state it reads. The watch-backed caches implement
//! [`ResourceLister`]; the CRD types implement [`MirroredResource`].

use crate::crd::HealthReading;
use crate::error::Result;
use std::sync::Arc;

// =============================================================================
// Listing
// =============================================================================

/// Which slice of the cache a list call reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope<'a> {
    /// Every namespace
    All,
    /// A single namespace
    Namespace(&'a str),
}

impl std::fmt::Display for ListScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListScope::All => write!(f, "*"),
            ListScope::Namespace(ns) => write!(f, "{}", ns),
        }
    }
}

/// Read-only access to a snapshot of resources of kind `K`
///
/// An error signals a transient read failure; it never affects the contents
/// of the underlying cache.
pub trait ResourceLister<K>: Send + Sync {
    /// List resources in the given scope
    fn list(&self, scope: ListScope<'_>) -> Result<Vec<Arc<K>>>;
}

// =============================================================================
// Mirrored Resources
// =============================================================================

/// A resource whose mirroring state is exported as metrics
pub trait MirroredResource: Send + Sync + 'static {
    /// Kind name used in log messages
    const KIND: &'static str;

    /// Value of the `name` label: the block pool the resource belongs to
    fn pool_name(&self) -> &str;

    /// Kubernetes namespace of the resource
    fn resource_namespace(&self) -> &str;

    /// Value of the `rados_namespace` label
    fn rados_namespace(&self) -> &str;

    /// Whether mirroring is configured on
    fn mirroring_enabled(&self) -> bool;

    /// Raw image health from the status summary
    fn image_health(&self) -> Option<&str>;

    /// Evaluated image health
    fn health_reading(&self) -> HealthReading<'_> {
        HealthReading::evaluate(self.mirroring_enabled(), self.image_health())
    }
}
