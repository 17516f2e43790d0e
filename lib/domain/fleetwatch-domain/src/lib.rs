//! Domain models for the fleet health monitor.

pub mod alert;
pub mod application;
pub mod cluster;
pub mod config;
pub mod error;
pub mod snapshot;

pub use alert::{AlertCategory, AlertLink, AlertMessage, AlertSeverity};
pub use application::{Application, HealthStatus, SyncStatus};
pub use cluster::{Cluster, ClusterResult};
pub use config::{ClusterConfig, FleetwatchConfig, NotificationChannelConfig, NotificationsConfig};
pub use error::MonitorError;
pub use snapshot::{GlobalSnapshot, Metrics, UpdateStatus};
