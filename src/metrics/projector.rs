//! Mirroring Projectors
//!
//! Map mirrored resources onto metric samples. The health projector only
//! emits for resources with mirroring on and a known health; the status
//! projector emits for every resource.

use super::sample::{MetricSample, SampleLabels};
use crate::crd::HealthReading;
use crate::domain::ports::MirroredResource;
use std::sync::Arc;
use tracing::error;

/// Emit an `image_health` sample per resource whose health can be reported
///
/// Resources with mirroring off are skipped silently. Resources with
/// mirroring on but a missing or unrecognized health are logged and skipped:
/// no sample is emitted rather than a default value.
pub fn project_image_health<K: MirroredResource>(resources: &[Arc<K>], out: &mut Vec<MetricSample>) {
    for resource in resources {
        match resource.health_reading() {
            HealthReading::NotEvaluated => continue,
            HealthReading::Unavailable => {
                error!(
                    kind = K::KIND,
                    pool = resource.pool_name(),
                    namespace = resource.resource_namespace(),
                    rados_namespace = resource.rados_namespace(),
                    "Mirroring is enabled but image health status is not available"
                );
            }
            HealthReading::Unrecognized(raw) => {
                error!(
                    kind = K::KIND,
                    pool = resource.pool_name(),
                    namespace = resource.resource_namespace(),
                    rados_namespace = resource.rados_namespace(),
                    image_health = raw,
                    "Invalid image health. Must be OK, UNKNOWN, WARNING or ERROR"
                );
            }
            HealthReading::Reported(health) => {
                out.push(MetricSample::image_health(
                    health.code(),
                    SampleLabels::of(resource.as_ref()),
                ));
            }
        }
    }
}

/// Emit a `status` sample (1 when mirroring is on, else 0) per resource
pub fn project_status<K: MirroredResource>(resources: &[Arc<K>], out: &mut Vec<MetricSample>) {
    out.extend(resources.iter().map(|resource| {
        MetricSample::status(
            resource.mirroring_enabled(),
            SampleLabels::of(resource.as_ref()),
        )
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{
        CephBlockPool, CephBlockPoolRadosNamespace, CephBlockPoolRadosNamespaceSpec,
        CephBlockPoolRadosNamespaceStatus, CephBlockPoolSpec, CephBlockPoolStatus,
        MirroringStatusSpec, MirroringStatusSummary, PoolMirroringSpec, RadosNamespaceMirroring,
    };
    use crate::metrics::sample::MirroringMetric;

    fn mirroring_status(health: Option<&str>) -> MirroringStatusSpec {
        MirroringStatusSpec {
            summary: Some(MirroringStatusSummary {
                image_health: health.map(str::to_string),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn pool(name: &str, enabled: bool, health: Option<&str>) -> Arc<CephBlockPool> {
        let mut pool = CephBlockPool::new(
            name,
            CephBlockPoolSpec {
                name: None,
                failure_domain: None,
                device_class: None,
                mirroring: PoolMirroringSpec {
                    enabled,
                    mode: None,
                },
            },
        );
        pool.metadata.namespace = Some("ns1".to_string());
        pool.status = Some(CephBlockPoolStatus {
            mirroring_status: Some(mirroring_status(health)),
            ..Default::default()
        });
        Arc::new(pool)
    }

    fn rados_namespace(name: &str, mode: Option<&str>, health: Option<&str>) -> Arc<CephBlockPoolRadosNamespace> {
        let mut rn = CephBlockPoolRadosNamespace::new(
            name,
            CephBlockPoolRadosNamespaceSpec {
                block_pool_name: "p1".to_string(),
                name: None,
                mirroring: mode.map(|m| RadosNamespaceMirroring {
                    mode: Some(m.to_string()),
                    remote_namespace: None,
                }),
            },
        );
        rn.metadata.namespace = Some("ns1".to_string());
        rn.status = Some(CephBlockPoolRadosNamespaceStatus {
            phase: None,
            mirroring_status: Some(mirroring_status(health)),
        });
        Arc::new(rn)
    }

    #[test]
    fn test_pool_health_codes() {
        let pools = vec![
            pool("ok", true, Some("OK")),
            pool("unknown", true, Some("UNKNOWN")),
            pool("warning", true, Some("WARNING")),
            pool("error", true, Some("ERROR")),
        ];
        let mut out = Vec::new();
        project_image_health(&pools, &mut out);

        let codes: Vec<(String, f64)> = out.iter().map(|s| (s.labels.name.clone(), s.value)).collect();
        assert_eq!(
            codes,
            vec![
                ("ok".to_string(), 0.0),
                ("unknown".to_string(), 1.0),
                ("warning".to_string(), 2.0),
                ("error".to_string(), 3.0),
            ]
        );
        assert!(out.iter().all(|s| s.metric == MirroringMetric::ImageHealth));
        assert!(out.iter().all(|s| s.labels.rados_namespace == "internal"));
    }

    #[test]
    fn test_pool_health_skips() {
        let pools = vec![
            pool("disabled", false, Some("OK")),
            pool("missing", true, None),
            pool("blank", true, Some("   ")),
            pool("bogus", true, Some("DEGRADED")),
        ];
        let mut out = Vec::new();
        project_image_health(&pools, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_pool_status_always_emitted() {
        let pools = vec![
            pool("p1", true, Some("OK")),
            pool("p2", false, None),
            pool("p3", true, None),
        ];
        let mut out = Vec::new();
        project_status(&pools, &mut out);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0], MetricSample::status(true, SampleLabels::new("p1", "ns1", "internal")));
        assert_eq!(out[1], MetricSample::status(false, SampleLabels::new("p2", "ns1", "internal")));
        assert_eq!(out[2].value, 1.0);
    }

    #[test]
    fn test_rados_namespace_health() {
        let namespaces = vec![
            rados_namespace("rn1", Some("image"), Some("ERROR")),
            rados_namespace("rn2", Some("pool"), Some("WARNING")),
            rados_namespace("rn3", None, Some("OK")),
            rados_namespace("rn4", Some("image"), Some("")),
        ];
        let mut out = Vec::new();
        project_image_health(&namespaces, &mut out);

        assert_eq!(
            out,
            vec![
                MetricSample::image_health(3, SampleLabels::new("p1", "ns1", "rn1")),
                MetricSample::image_health(2, SampleLabels::new("p1", "ns1", "rn2")),
            ]
        );
    }

    #[test]
    fn test_rados_namespace_status() {
        let namespaces = vec![
            rados_namespace("rn1", Some("image"), None),
            rados_namespace("rn2", Some("pool"), None),
            rados_namespace("rn3", None, None),
            rados_namespace("rn4", Some("snapshot"), None),
        ];
        let mut out = Vec::new();
        project_status(&namespaces, &mut out);

        let values: Vec<f64> = out.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1.0, 1.0, 0.0, 0.0]);
        assert!(out.iter().all(|s| s.labels.name == "p1"));
    }
}
