use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

use fleetwatch_domain::{Cluster, MonitorError};
use fleetwatch_ports::ClusterApiPort;

#[derive(Debug, Clone)]
struct Session {
    token: String,
    expires_at: Instant,
}

/// Per-cluster session tokens with a fixed time-to-live.
///
/// Entries are replaced whole, never edited in place, so concurrent readers
/// see either the old or the new session.
pub struct CredentialCache {
    api: Arc<dyn ClusterApiPort>,
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl CredentialCache {
    pub fn new(api: Arc<dyn ClusterApiPort>, ttl: Duration) -> Self {
        Self {
            api,
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a valid token, logging in only on a miss or after expiry.
    pub async fn get_token(&self, cluster: &Cluster) -> Result<String, MonitorError> {
        if let Some(session) = self.sessions.read().await.get(&cluster.name) {
            if Instant::now() < session.expires_at {
                debug!(cluster = %cluster.name, "reusing cached session token");
                return Ok(session.token.clone());
            }
        }

        info!(cluster = %cluster.name, "logging in to cluster");
        let token = self.api.login(cluster).await?;
        if token.trim().is_empty() {
            return Err(MonitorError::auth(&cluster.name, "login response carried no token"));
        }

        let session = Session {
            token: token.clone(),
            expires_at: Instant::now() + self.ttl,
        };
        self.sessions
            .write()
            .await
            .insert(cluster.name.clone(), session);
        Ok(token)
    }

    /// Drops a cluster's session so the next request logs in again.
    pub async fn invalidate(&self, cluster: &str) {
        if self.sessions.write().await.remove(cluster).is_some() {
            debug!(cluster, "evicted session token");
        }
    }

    /// Removes expired sessions. Reads already ignore them; this only frees memory.
    pub async fn purge_expired(&self) {
        let now = Instant::now();
        self.sessions
            .write()
            .await
            .retain(|_, session| now < session.expires_at);
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
