use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Liveness classification reported by the controller for one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Missing,
    #[default]
    Unknown,
    Failed,
}

impl HealthStatus {
    /// Maps the controller's status string. Anything unrecognised is `Unknown`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("Healthy") => Self::Healthy,
            Some("Degraded") => Self::Degraded,
            Some("Missing") => Self::Missing,
            Some("Failed") => Self::Failed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Degraded => "Degraded",
            Self::Missing => "Missing",
            Self::Unknown => "Unknown",
            Self::Failed => "Failed",
        }
    }
}

/// Drift between desired and live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SyncStatus {
    Synced,
    OutOfSync,
    Processing,
    #[default]
    Unknown,
}

impl SyncStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("Synced") => Self::Synced,
            Some("OutOfSync") => Self::OutOfSync,
            Some("Processing") => Self::Processing,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Synced => "Synced",
            Self::OutOfSync => "OutOfSync",
            Self::Processing => "Processing",
            Self::Unknown => "Unknown",
        }
    }
}

/// Read-only projection of a remote application object.
///
/// `metadata`, `spec` and `status` are the raw payloads from the controller,
/// carried through untouched for downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub name: String,
    pub health: HealthStatus,
    pub sync: SyncStatus,
    #[serde(default)]
    pub metadata: Value,
    #[serde(default)]
    pub spec: Value,
    #[serde(default)]
    pub status: Value,
}

impl Application {
    pub fn new(name: impl Into<String>, health: HealthStatus, sync: SyncStatus) -> Self {
        Self {
            name: name.into(),
            health,
            sync,
            metadata: Value::Null,
            spec: Value::Null,
            status: Value::Null,
        }
    }

    /// True when the application should be reported to operators.
    pub fn is_problem(&self) -> bool {
        matches!(
            self.health,
            HealthStatus::Unknown | HealthStatus::Degraded | HealthStatus::Missing
        ) || self.sync == SyncStatus::OutOfSync
    }
}
