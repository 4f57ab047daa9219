//! Metric Samples
//!
//! Plain values produced by the projectors on every scrape and discarded once
//! they have been encoded.

use crate::domain::ports::MirroredResource;

/// Label names shared by every pool mirroring metric, in exposition order
pub const LABEL_NAMES: [&str; 3] = ["name", "namespace", "rados_namespace"];

/// The exported pool mirroring metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MirroringMetric {
    /// 0=OK, 1=UNKNOWN, 2=WARNING, 3=ERROR
    ImageHealth,
    /// 0=Disabled, 1=Enabled
    Status,
}

impl MirroringMetric {
    pub const ALL: [MirroringMetric; 2] = [MirroringMetric::ImageHealth, MirroringMetric::Status];

    /// Metric name below the `<namespace>_pool_mirroring` prefix
    pub fn name(self) -> &'static str {
        match self {
            MirroringMetric::ImageHealth => "image_health",
            MirroringMetric::Status => "status",
        }
    }
}

impl std::fmt::Display for MirroringMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Label values identifying the pool (or rados namespace) a sample is about
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleLabels {
    pub name: String,
    pub namespace: String,
    pub rados_namespace: String,
}

impl SampleLabels {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        rados_namespace: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            rados_namespace: rados_namespace.into(),
        }
    }

    /// Labels for a mirrored resource
    pub fn of<R: MirroredResource>(resource: &R) -> Self {
        Self::new(
            resource.pool_name(),
            resource.resource_namespace(),
            resource.rados_namespace(),
        )
    }

    /// Values in [`LABEL_NAMES`] order
    pub fn values(&self) -> [&str; 3] {
        [&self.name, &self.namespace, &self.rados_namespace]
    }
}

/// One gauge value
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub metric: MirroringMetric,
    pub value: f64,
    pub labels: SampleLabels,
}

impl MetricSample {
    pub fn image_health(code: u8, labels: SampleLabels) -> Self {
        Self {
            metric: MirroringMetric::ImageHealth,
            value: f64::from(code),
            labels,
        }
    }

    pub fn status(enabled: bool, labels: SampleLabels) -> Self {
        Self {
            metric: MirroringMetric::Status,
            value: if enabled { 1.0 } else { 0.0 },
            labels,
        }
    }
}
