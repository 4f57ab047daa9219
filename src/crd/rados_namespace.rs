//! CephBlockPoolRadosNamespace CRD
//!
//! A rados namespace partitions a block pool; mirroring can be configured per
//! namespace independently of the parent pool.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::mirroring::MirroringStatusSpec;
use crate::domain::ports::MirroredResource;

// =============================================================================
// CephBlockPoolRadosNamespace CRD
// =============================================================================

/// CephBlockPoolRadosNamespace represents a rados namespace inside a block pool.
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "ceph.rook.io",
    version = "v1",
    kind = "CephBlockPoolRadosNamespace",
    plural = "cephblockpoolradosnamespaces",
    status = "CephBlockPoolRadosNamespaceStatus",
    printcolumn = r#"{"name": "Pool", "type": "string", "jsonPath": ".spec.blockPoolName"}"#,
    printcolumn = r#"{"name": "Phase", "type": "string", "jsonPath": ".status.phase"}"#,
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct CephBlockPoolRadosNamespaceSpec {
    /// Name of the parent CephBlockPool
    pub block_pool_name: String,

    /// Name of the namespace inside Ceph, when it differs from the resource name
    #[serde(default)]
    pub name: Option<String>,

    /// Mirroring configuration
    #[serde(default)]
    pub mirroring: Option<RadosNamespaceMirroring>,
}

/// Rados namespace mirroring configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RadosNamespaceMirroring {
    /// Mirroring mode: "pool", "image", or empty when disabled
    #[serde(default)]
    pub mode: Option<String>,

    /// Namespace on the peer cluster to mirror to
    #[serde(default)]
    pub remote_namespace: Option<String>,
}

/// Mirroring mode of a rados namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RadosNamespaceMirroringMode {
    #[default]
    Disabled,
    Pool,
    Image,
}

impl RadosNamespaceMirroringMode {
    /// Parse the wire value. Unknown modes are treated as disabled.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pool" => RadosNamespaceMirroringMode::Pool,
            "image" => RadosNamespaceMirroringMode::Image,
            _ => RadosNamespaceMirroringMode::Disabled,
        }
    }

    pub fn is_enabled(self) -> bool {
        matches!(
            self,
            RadosNamespaceMirroringMode::Pool | RadosNamespaceMirroringMode::Image
        )
    }
}

impl std::fmt::Display for RadosNamespaceMirroringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RadosNamespaceMirroringMode::Disabled => write!(f, "disabled"),
            RadosNamespaceMirroringMode::Pool => write!(f, "pool"),
            RadosNamespaceMirroringMode::Image => write!(f, "image"),
        }
    }
}

// =============================================================================
// Status
// =============================================================================

/// Status of the CephBlockPoolRadosNamespace
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CephBlockPoolRadosNamespaceStatus {
    /// Current phase
    #[serde(default)]
    pub phase: Option<String>,

    /// Mirroring status
    #[serde(default)]
    pub mirroring_status: Option<MirroringStatusSpec>,
}

// =============================================================================
// Implementations
// =============================================================================

impl CephBlockPoolRadosNamespace {
    /// Configured mirroring mode
    pub fn mirroring_mode(&self) -> RadosNamespaceMirroringMode {
        self.spec
            .mirroring
            .as_ref()
            .and_then(|m| m.mode.as_deref())
            .map(RadosNamespaceMirroringMode::parse)
            .unwrap_or_default()
    }
}

impl MirroredResource for CephBlockPoolRadosNamespace {
    const KIND: &'static str = "CephBlockPoolRadosNamespace";

    fn pool_name(&self) -> &str {
        &self.spec.block_pool_name
    }

    fn resource_namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or_default()
    }

    fn rados_namespace(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    fn mirroring_enabled(&self) -> bool {
        self.mirroring_mode().is_enabled()
    }

    fn image_health(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.mirroring_status.as_ref())
            .and_then(|m| m.image_health())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{HealthReading, ImageHealth};

    #[test]
    fn test_mode_parse() {
        assert_eq!(RadosNamespaceMirroringMode::parse("pool"), RadosNamespaceMirroringMode::Pool);
        assert_eq!(RadosNamespaceMirroringMode::parse("image"), RadosNamespaceMirroringMode::Image);
        assert_eq!(RadosNamespaceMirroringMode::parse(""), RadosNamespaceMirroringMode::Disabled);
        assert_eq!(RadosNamespaceMirroringMode::parse("Image"), RadosNamespaceMirroringMode::Disabled);
        assert!(!RadosNamespaceMirroringMode::Disabled.is_enabled());
    }

    #[test]
    fn test_deserialize_rados_namespace() {
        let rn: CephBlockPoolRadosNamespace = serde_json::from_value(serde_json::json!({
            "apiVersion": "ceph.rook.io/v1",
            "kind": "CephBlockPoolRadosNamespace",
            "metadata": {"name": "rn1", "namespace": "ns1"},
            "spec": {
                "blockPoolName": "p1",
                "mirroring": {"mode": "image", "remoteNamespace": "rn1-remote"}
            },
            "status": {
                "phase": "Ready",
                "mirroringStatus": {"summary": {"image_health": "ERROR"}}
            }
        }))
        .unwrap();

        assert_eq!(rn.pool_name(), "p1");
        assert_eq!(rn.resource_namespace(), "ns1");
        assert_eq!(rn.rados_namespace(), "rn1");
        assert_eq!(rn.mirroring_mode(), RadosNamespaceMirroringMode::Image);
        assert_eq!(rn.health_reading(), HealthReading::Reported(ImageHealth::Error));
    }

    #[test]
    fn test_no_mirroring_block() {
        let rn: CephBlockPoolRadosNamespace = serde_json::from_value(serde_json::json!({
            "apiVersion": "ceph.rook.io/v1",
            "kind": "CephBlockPoolRadosNamespace",
            "metadata": {"name": "rn2", "namespace": "ns1"},
            "spec": {"blockPoolName": "p1"},
            "status": {"mirroringStatus": {"summary": {"image_health": "OK"}}}
        }))
        .unwrap();

        assert_eq!(rn.mirroring_mode(), RadosNamespaceMirroringMode::Disabled);
        assert!(!rn.mirroring_enabled());
        assert_eq!(rn.health_reading(), HealthReading::NotEvaluated);
    }
}
