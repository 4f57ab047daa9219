//! Metric Descriptor Registry
//!
//! The fixed schema of the pool mirroring metrics. Built once at startup from
//! the exporter namespace and shared read-only with the collector.

use super::sample::{MetricSample, MirroringMetric, LABEL_NAMES};
use crate::error::Result;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{GaugeVec, Opts};
use std::collections::HashMap;
use tracing::error;

/// Subsystem shared by all pool mirroring metrics
pub const SUBSYSTEM: &str = "pool_mirroring";

pub const IMAGE_HEALTH_HELP: &str =
    "Pool Mirroring Image Health. 0=OK, 1=UNKNOWN, 2=WARNING & 3=ERROR";

pub const STATUS_HELP: &str = "Pool Mirroring Status.  0=Disabled, 1=Enabled";

// =============================================================================
// Metric Descriptor
// =============================================================================

/// Name, help text, and label set of one gauge
#[derive(Debug)]
pub struct MetricDescriptor {
    opts: Opts,
    desc: Desc,
}

impl MetricDescriptor {
    fn new(exporter_namespace: &str, metric: MirroringMetric, help: &str) -> Result<Self> {
        let opts = Opts::new(metric.name(), help)
            .namespace(exporter_namespace)
            .subsystem(SUBSYSTEM);
        let desc = Desc::new(
            opts.fq_name(),
            help.to_string(),
            LABEL_NAMES.iter().map(|l| l.to_string()).collect(),
            HashMap::new(),
        )?;
        Ok(Self { opts, desc })
    }

    /// Fully-qualified metric name
    pub fn fq_name(&self) -> &str {
        &self.desc.fq_name
    }

    pub fn help(&self) -> &str {
        &self.desc.help
    }

    pub fn label_names(&self) -> &[String] {
        &self.desc.variable_labels
    }

    pub fn desc(&self) -> &Desc {
        &self.desc
    }

    /// Encode samples as a gauge family. Returns nothing when there are no
    /// samples.
    fn encode<'a>(
        &self,
        samples: impl Iterator<Item = &'a MetricSample>,
    ) -> Result<Vec<MetricFamily>> {
        let gauges = GaugeVec::new(self.opts.clone(), &LABEL_NAMES)?;
        let mut populated = false;
        for sample in samples {
            gauges
                .get_metric_with_label_values(&sample.labels.values())?
                .set(sample.value);
            populated = true;
        }
        if !populated {
            return Ok(Vec::new());
        }
        Ok(gauges.collect())
    }
}

// =============================================================================
// Metric Descriptors
// =============================================================================

/// The two pool mirroring gauges
#[derive(Debug)]
pub struct MetricDescriptors {
    image_health: MetricDescriptor,
    status: MetricDescriptor,
}

impl MetricDescriptors {
    /// Build the descriptors under `<exporter_namespace>_pool_mirroring_`
    ///
    /// Fails when the namespace would produce an invalid metric name.
    pub fn new(exporter_namespace: &str) -> Result<Self> {
        Ok(Self {
            image_health: MetricDescriptor::new(
                exporter_namespace,
                MirroringMetric::ImageHealth,
                IMAGE_HEALTH_HELP,
            )?,
            status: MetricDescriptor::new(exporter_namespace, MirroringMetric::Status, STATUS_HELP)?,
        })
    }

    pub fn get(&self, metric: MirroringMetric) -> &MetricDescriptor {
        match metric {
            MirroringMetric::ImageHealth => &self.image_health,
            MirroringMetric::Status => &self.status,
        }
    }

    /// Descriptors in declaration order
    pub fn descs(&self) -> Vec<&Desc> {
        MirroringMetric::ALL
            .iter()
            .map(|m| self.get(*m).desc())
            .collect()
    }

    /// Encode samples into metric families
    ///
    /// A family that fails to encode is logged and left out; the others are
    /// still returned.
    pub fn encode(&self, samples: &[MetricSample]) -> Vec<MetricFamily> {
        let mut families = Vec::with_capacity(MirroringMetric::ALL.len());
        for metric in MirroringMetric::ALL {
            let descriptor = self.get(metric);
            match descriptor.encode(samples.iter().filter(|s| s.metric == metric)) {
                Ok(encoded) => families.extend(encoded),
                Err(e) => {
                    error!(metric = %descriptor.fq_name(), error = %e, "Failed to encode metric family");
                }
            }
        }
        families
    }
}
