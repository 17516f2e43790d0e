use serde::{Deserialize, Serialize};

use crate::application::{Application, HealthStatus, SyncStatus};

/// Grouping used in problem alerts. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertCategory {
    Missing,
    Unknown,
    Degraded,
    OutOfSync,
}

impl AlertCategory {
    /// Health problems take precedence over drift, so an app that is both
    /// degraded and out of sync is listed once, under `Degraded`.
    pub fn of(app: &Application) -> Option<Self> {
        match app.health {
            HealthStatus::Missing => Some(Self::Missing),
            HealthStatus::Unknown => Some(Self::Unknown),
            HealthStatus::Degraded => Some(Self::Degraded),
            HealthStatus::Healthy | HealthStatus::Failed if app.sync == SyncStatus::OutOfSync => {
                Some(Self::OutOfSync)
            }
            _ => None,
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Self::Missing => "Missing",
            Self::Unknown => "Unknown health",
            Self::Degraded => "Degraded",
            Self::OutOfSync => "Out of sync",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Problem,
    Recovered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertLink {
    pub label: String,
    pub url: String,
}

/// Formatted message handed to the messaging sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub cluster: String,
    pub severity: AlertSeverity,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub links: Vec<AlertLink>,
}

impl AlertMessage {
    /// Title and body joined, for sinks that only take plain text.
    pub fn text(&self) -> String {
        if self.body.is_empty() {
            self.title.clone()
        } else {
            format!("{}\n{}", self.title, self.body)
        }
    }
}
