//! CephBlockPool Collector
//!
//! Prometheus collector that turns the cached CephBlockPool and
//! CephBlockPoolRadosNamespace resources into pool mirroring gauges on every
//! scrape.
//!
//! A scrape never fails: listing and validation problems are logged and only
//! reduce the set of samples returned.

use super::descriptors::MetricDescriptors;
use super::enumerator::enumerate;
use super::projector::{project_image_health, project_status};
use super::sample::{MetricSample, MirroringMetric, SampleLabels};
use crate::crd::{CephBlockPool, CephBlockPoolRadosNamespace};
use crate::domain::ports::{MirroredResource, ResourceLister};
use crate::error::Result;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use std::collections::hash_map::{Entry, HashMap};
use std::sync::Arc;
use tracing::{debug, error};

/// Default prefix of every exported metric
pub const DEFAULT_EXPORTER_NAMESPACE: &str = "ocs";

// =============================================================================
// Collector Configuration
// =============================================================================

/// Configuration for the collector
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Prefix of the exported metric names
    pub exporter_namespace: String,
    /// Namespaces to report on; empty means all namespaces
    pub allowed_namespaces: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            exporter_namespace: DEFAULT_EXPORTER_NAMESPACE.to_string(),
            allowed_namespaces: Vec::new(),
        }
    }
}

impl CollectorConfig {
    /// Create a config, normalizing the namespace list
    ///
    /// Entries are trimmed, blank entries dropped, and duplicates removed
    /// keeping the first occurrence.
    pub fn new<I, S>(exporter_namespace: impl Into<String>, allowed_namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut namespaces: Vec<String> = Vec::new();
        for ns in allowed_namespaces {
            let ns = ns.as_ref().trim();
            if !ns.is_empty() && !namespaces.iter().any(|n| n == ns) {
                namespaces.push(ns.to_string());
            }
        }

        Self {
            exporter_namespace: exporter_namespace.into(),
            allowed_namespaces: namespaces,
        }
    }
}

// =============================================================================
// Collector
// =============================================================================

/// Collector for the mirroring state of CephBlockPools and their rados
/// namespaces
pub struct CephBlockPoolCollector {
    descriptors: MetricDescriptors,
    pools: Arc<dyn ResourceLister<CephBlockPool>>,
    rados_namespaces: Arc<dyn ResourceLister<CephBlockPoolRadosNamespace>>,
    allowed_namespaces: Vec<String>,
}

impl CephBlockPoolCollector {
    /// Create a collector reading from the given listers
    pub fn new(
        config: &CollectorConfig,
        pools: Arc<dyn ResourceLister<CephBlockPool>>,
        rados_namespaces: Arc<dyn ResourceLister<CephBlockPoolRadosNamespace>>,
    ) -> Result<Self> {
        let descriptors = MetricDescriptors::new(&config.exporter_namespace)?;
        Ok(Self {
            descriptors,
            pools,
            rados_namespaces,
            allowed_namespaces: config.allowed_namespaces.clone(),
        })
    }

    /// Run one collection pass and return the raw samples
    ///
    /// Each call builds its own result from the current cache contents.
    pub fn samples(&self) -> Vec<MetricSample> {
        let mut samples = Vec::new();
        let mut seen = HashMap::new();

        let pools = enumerate(self.pools.as_ref(), &self.allowed_namespaces);
        if !pools.is_empty() {
            let mut projected = Vec::new();
            project_image_health(&pools, &mut projected);
            project_status(&pools, &mut projected);
            keep_first(&mut samples, &mut seen, CephBlockPool::KIND, projected);
        }

        let rados_namespaces = enumerate(self.rados_namespaces.as_ref(), &self.allowed_namespaces);
        if !rados_namespaces.is_empty() {
            let mut projected = Vec::new();
            project_image_health(&rados_namespaces, &mut projected);
            project_status(&rados_namespaces, &mut projected);
            keep_first(
                &mut samples,
                &mut seen,
                CephBlockPoolRadosNamespace::KIND,
                projected,
            );
        }

        debug!(
            pools = pools.len(),
            rados_namespaces = rados_namespaces.len(),
            samples = samples.len(),
            "Collected pool mirroring samples"
        );
        samples
    }
}

/// Append `projected` to `out`, dropping samples whose metric and label set
/// were already emitted this pass. The first sample wins.
fn keep_first(
    out: &mut Vec<MetricSample>,
    seen: &mut HashMap<(MirroringMetric, SampleLabels), &'static str>,
    kind: &'static str,
    projected: Vec<MetricSample>,
) {
    for sample in projected {
        match seen.entry((sample.metric, sample.labels.clone())) {
            Entry::Occupied(first) => {
                error!(
                    metric = %sample.metric,
                    name = %sample.labels.name,
                    namespace = %sample.labels.namespace,
                    rados_namespace = %sample.labels.rados_namespace,
                    kept = *first.get(),
                    dropped = kind,
                    "Duplicate label set, keeping the first sample"
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(kind);
                out.push(sample);
            }
        }
    }
}

impl Collector for CephBlockPoolCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.descriptors.descs()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.descriptors.encode(&self.samples())
    }
}
