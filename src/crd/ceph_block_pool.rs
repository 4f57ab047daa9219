//! CephBlockPool CRD
//!
//! Read-only view of the Rook `CephBlockPool` resource. Only the fields the
//! exporter needs are modelled; everything else is ignored on deserialize.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::mirroring::MirroringStatusSpec;
use crate::domain::ports::MirroredResource;

/// `rados_namespace` label value for a pool's own (default) namespace
pub const DEFAULT_RADOS_NAMESPACE: &str = "internal";

// =============================================================================
// CephBlockPool CRD
// =============================================================================

/// CephBlockPool represents a Ceph RBD pool managed by Rook.
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "ceph.rook.io",
    version = "v1",
    kind = "CephBlockPool",
    plural = "cephblockpools",
    status = "CephBlockPoolStatus",
    printcolumn = r#"{"name": "Phase", "type": "string", "jsonPath": ".status.phase"}"#,
    printcolumn = r#"{"name": "Age", "type": "date", "jsonPath": ".metadata.creationTimestamp"}"#,
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct CephBlockPoolSpec {
    /// Name of the pool inside Ceph, when it differs from the resource name
    #[serde(default)]
    pub name: Option<String>,

    /// Failure domain (host, rack, zone, ...)
    #[serde(default)]
    pub failure_domain: Option<String>,

    /// Device class the pool's CRUSH rule selects
    #[serde(default)]
    pub device_class: Option<String>,

    /// Mirroring configuration
    #[serde(default)]
    pub mirroring: PoolMirroringSpec,
}

/// Pool mirroring configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolMirroringSpec {
    /// Whether mirroring is enabled for the pool
    #[serde(default)]
    pub enabled: bool,

    /// Mirroring mode (pool or image)
    #[serde(default)]
    pub mode: Option<String>,
}

// =============================================================================
// Status
// =============================================================================

/// Status of the CephBlockPool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CephBlockPoolStatus {
    /// Current phase
    #[serde(default)]
    pub phase: Option<String>,

    /// Mirroring status
    #[serde(default)]
    pub mirroring_status: Option<MirroringStatusSpec>,

    /// Last observed generation
    #[serde(default)]
    pub observed_generation: Option<i64>,
}

// =============================================================================
// Implementations
// =============================================================================

impl MirroredResource for CephBlockPool {
    const KIND: &'static str = "CephBlockPool";

    fn pool_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    fn resource_namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or_default()
    }

    fn rados_namespace(&self) -> &str {
        DEFAULT_RADOS_NAMESPACE
    }

    fn mirroring_enabled(&self) -> bool {
        self.spec.mirroring.enabled
    }

    fn image_health(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.mirroring_status.as_ref())
            .and_then(|m| m.image_health())
    }
}
