use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cluster::ClusterResult;

/// Fleet-wide counters for one refresh cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_apps: u64,
    pub healthy_apps: u64,
    pub synced_apps: u64,
    pub degraded_apps: u64,
    pub failed_apps: u64,
    pub out_of_sync_apps: u64,
    pub unknown_apps: u64,
    pub processing_apps: u64,
}

/// Aggregated global state produced at the end of a refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSnapshot {
    pub metrics: Metrics,
    pub clusters: Vec<ClusterResult>,
    pub last_update: Option<DateTime<Utc>>,
}

impl GlobalSnapshot {
    /// What readers get before the first cycle completes.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.last_update.is_none()
    }
}

/// Scheduler progress as seen by readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatus {
    pub last_update: Option<DateTime<Utc>>,
    pub next_update: Option<DateTime<Utc>>,
    pub remaining_seconds: u64,
    pub is_updating: bool,
}
