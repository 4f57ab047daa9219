//! Mirroring status types shared by pools and rados namespaces
//!
//! Rook reports the mirroring summary of a pool (or a rados namespace inside
//! a pool) under `status.mirroringStatus.summary`. The summary keys are
//! snake_case on the wire, unlike the rest of the resource.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// =============================================================================
// Status Types
// =============================================================================

/// Mirroring status reported by the Rook operator
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MirroringStatusSpec {
    /// Summary of the `rbd mirror pool status` output
    #[serde(default)]
    pub summary: Option<MirroringStatusSummary>,

    /// Last time the status was refreshed
    #[serde(default)]
    pub last_checked: Option<String>,

    /// Last time the status changed
    #[serde(default)]
    pub last_changed: Option<String>,

    /// Error details when the status could not be retrieved
    #[serde(default)]
    pub details: Option<String>,
}

/// Mirroring summary
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MirroringStatusSummary {
    /// Overall mirroring health
    #[serde(default)]
    pub health: Option<String>,

    /// Health of the rbd-mirror daemons
    #[serde(default)]
    pub daemon_health: Option<String>,

    /// Aggregated health of the mirrored images
    #[serde(default)]
    pub image_health: Option<String>,
}

impl MirroringStatusSpec {
    /// Raw image health string, if the summary carries one
    pub fn image_health(&self) -> Option<&str> {
        self.summary
            .as_ref()
            .and_then(|s| s.image_health.as_deref())
    }
}

// =============================================================================
// Image Health
// =============================================================================

/// Aggregated health of mirrored images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ImageHealth {
    Ok = 0,
    Unknown = 1,
    Warning = 2,
    Error = 3,
}

/// Every health string Rook reports, and what it maps to.
const IMAGE_HEALTH_TABLE: [(&str, ImageHealth); 4] = [
    ("OK", ImageHealth::Ok),
    ("UNKNOWN", ImageHealth::Unknown),
    ("WARNING", ImageHealth::Warning),
    ("ERROR", ImageHealth::Error),
];

impl ImageHealth {
    /// Look up a reported health string. Matching is exact; anything that is
    /// not in the table is unmapped.
    pub fn lookup(raw: &str) -> Option<Self> {
        IMAGE_HEALTH_TABLE
            .iter()
            .find(|(wire, _)| *wire == raw)
            .map(|(_, health)| *health)
    }

    /// Metric code: 0=OK, 1=UNKNOWN, 2=WARNING, 3=ERROR
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageHealth::Ok => "OK",
            ImageHealth::Unknown => "UNKNOWN",
            ImageHealth::Warning => "WARNING",
            ImageHealth::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for ImageHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Health Reading
// =============================================================================

/// Outcome of evaluating the image health of a mirrored resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthReading<'a> {
    /// Mirroring is not enabled, health is not evaluated
    NotEvaluated,
    /// Mirroring is enabled but no health has been reported
    Unavailable,
    /// A health string outside the known set
    Unrecognized(&'a str),
    /// A known health state
    Reported(ImageHealth),
}

impl<'a> HealthReading<'a> {
    /// Classify a resource's mirroring state
    pub fn evaluate(mirroring_enabled: bool, raw: Option<&'a str>) -> Self {
        if !mirroring_enabled {
            return HealthReading::NotEvaluated;
        }
        match raw {
            None => HealthReading::Unavailable,
            Some(s) if s.trim().is_empty() => HealthReading::Unavailable,
            Some(s) => match ImageHealth::lookup(s) {
                Some(health) => HealthReading::Reported(health),
                None => HealthReading::Unrecognized(s),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_lookup_table() {
        assert_eq!(ImageHealth::lookup("OK"), Some(ImageHealth::Ok));
        assert_eq!(ImageHealth::lookup("UNKNOWN"), Some(ImageHealth::Unknown));
        assert_eq!(ImageHealth::lookup("WARNING"), Some(ImageHealth::Warning));
        assert_eq!(ImageHealth::lookup("ERROR"), Some(ImageHealth::Error));

        assert_eq!(ImageHealth::lookup("ok"), None);
        assert_eq!(ImageHealth::lookup(" OK"), None);
        assert_eq!(ImageHealth::lookup("HEALTHY"), None);
    }

    #[test]
    fn test_codes() {
        assert_eq!(ImageHealth::Ok.code(), 0);
        assert_eq!(ImageHealth::Unknown.code(), 1);
        assert_eq!(ImageHealth::Warning.code(), 2);
        assert_eq!(ImageHealth::Error.code(), 3);
        assert_eq!(format!("{}", ImageHealth::Warning), "WARNING");
    }

    #[test]
    fn test_health_reading() {
        assert_matches!(
            HealthReading::evaluate(false, Some("OK")),
            HealthReading::NotEvaluated
        );
        assert_matches!(HealthReading::evaluate(true, None), HealthReading::Unavailable);
        assert_matches!(
            HealthReading::evaluate(true, Some("  \t")),
            HealthReading::Unavailable
        );
        assert_matches!(
            HealthReading::evaluate(true, Some("DEGRADED")),
            HealthReading::Unrecognized("DEGRADED")
        );
        assert_matches!(
            HealthReading::evaluate(true, Some("ERROR")),
            HealthReading::Reported(ImageHealth::Error)
        );
    }

    #[test]
    fn test_summary_wire_format() {
        let status: MirroringStatusSpec = serde_json::from_value(serde_json::json!({
            "lastChecked": "2024-01-01T00:00:00Z",
            "summary": {
                "daemon_health": "OK",
                "health": "WARNING",
                "image_health": "WARNING",
                "states": {"replaying": 3}
            }
        }))
        .unwrap();

        assert_eq!(status.image_health(), Some("WARNING"));
        assert_eq!(status.last_checked.as_deref(), Some("2024-01-01T00:00:00Z"));
    }
}
