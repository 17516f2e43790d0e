//! Service configuration, loaded from YAML.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;
use crate::error::MonitorError;

const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;
const DEFAULT_ALERT_INTERVAL_SECS: u64 = 3600;
// Controller sessions live 24h; renew an hour early.
const DEFAULT_SESSION_TTL_SECS: u64 = 23 * 3600;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetwatchConfig {
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_alert_interval")]
    pub alert_interval_secs: u64,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
    #[serde(default)]
    pub snapshot_ttl_secs: Option<u64>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub excluded_apps: Vec<String>,
    pub clusters: Vec<ClusterConfig>,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub name: String,
    pub url: String,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    /// Name of an environment variable holding the password.
    #[serde(default)]
    pub password_env: Option<String>,
    #[serde(default)]
    pub insecure: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub channels: Vec<NotificationChannelConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NotificationChannelConfig {
    Webhook { url: String },
    Ntfy { url: String, topic: String },
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

fn default_alert_interval() -> u64 {
    DEFAULT_ALERT_INTERVAL_SECS
}

fn default_session_ttl() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl FleetwatchConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, MonitorError> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            MonitorError::Config(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, MonitorError> {
        let config: Self = serde_yaml::from_str(raw)
            .map_err(|err| MonitorError::Config(format!("malformed YAML: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.clusters.is_empty() {
            return Err(MonitorError::Config("no clusters configured".into()));
        }
        if self.refresh_interval_secs == 0 || self.alert_interval_secs == 0 {
            return Err(MonitorError::Config(
                "refresh and alert intervals must be non-zero".into(),
            ));
        }
        if self.session_ttl_secs == 0 || self.snapshot_ttl_secs == Some(0) {
            return Err(MonitorError::Config("cache TTLs must be non-zero".into()));
        }

        let mut seen = HashSet::new();
        for cluster in &self.clusters {
            if cluster.name.trim().is_empty() {
                return Err(MonitorError::Config("cluster name must not be empty".into()));
            }
            if !seen.insert(cluster.name.as_str()) {
                return Err(MonitorError::Config(format!(
                    "duplicate cluster name '{}'",
                    cluster.name
                )));
            }
            if cluster.url.trim().is_empty() || cluster.username.trim().is_empty() {
                return Err(MonitorError::Config(format!(
                    "cluster '{}' needs a url and a username",
                    cluster.name
                )));
            }
            if cluster.password.is_none() && cluster.password_env.is_none() {
                return Err(MonitorError::Config(format!(
                    "cluster '{}' needs password or password_env",
                    cluster.name
                )));
            }
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn alert_interval(&self) -> Duration {
        Duration::from_secs(self.alert_interval_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Defaults to twice the refresh interval so a healthy scheduler always
    /// replaces the snapshot before it expires.
    pub fn snapshot_ttl(&self) -> Duration {
        Duration::from_secs(
            self.snapshot_ttl_secs
                .unwrap_or(self.refresh_interval_secs.saturating_mul(2)),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolves credentials and returns clusters in configuration order.
    pub fn resolve_clusters(&self) -> Result<Vec<Cluster>, MonitorError> {
        self.clusters.iter().map(ClusterConfig::resolve).collect()
    }
}

impl ClusterConfig {
    pub fn resolve(&self) -> Result<Cluster, MonitorError> {
        let password = match (&self.password, &self.password_env) {
            (Some(password), _) => password.clone(),
            (None, Some(var)) => std::env::var(var).map_err(|_| {
                MonitorError::Config(format!(
                    "cluster '{}': environment variable {var} is not set",
                    self.name
                ))
            })?,
            (None, None) => {
                return Err(MonitorError::Config(format!(
                    "cluster '{}' has no password",
                    self.name
                )));
            }
        };
        let mut cluster = Cluster::new(&self.name, &self.url, &self.username, password);
        cluster.insecure = self.insecure;
        Ok(cluster)
    }
}
