use std::sync::Arc;

use tracing::{debug, warn};

use fleetwatch_domain::{Application, Cluster, MonitorError};
use fleetwatch_ports::ClusterApiPort;

use crate::credentials::CredentialCache;

/// Fetches one cluster's application list with a cached session token.
///
/// A single attempt per call; retrying is left to the next scheduled cycle.
pub struct ClusterPoller {
    api: Arc<dyn ClusterApiPort>,
    credentials: CredentialCache,
}

impl ClusterPoller {
    pub fn new(api: Arc<dyn ClusterApiPort>, credentials: CredentialCache) -> Self {
        Self { api, credentials }
    }

    pub fn credentials(&self) -> &CredentialCache {
        &self.credentials
    }

    pub async fn fetch_applications(
        &self,
        cluster: &Cluster,
    ) -> Result<Vec<Application>, MonitorError> {
        let token = self.credentials.get_token(cluster).await?;
        let apps = match self.api.list_applications(cluster, &token).await {
            Ok(apps) => apps,
            Err(err @ MonitorError::Authentication { .. }) => {
                // Token was revoked server-side; log in afresh next cycle.
                self.credentials.invalidate(&cluster.name).await;
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        if apps.is_empty() {
            warn!(cluster = %cluster.name, "cluster returned no applications");
        } else {
            debug!(cluster = %cluster.name, apps = apps.len(), "fetched applications");
        }
        Ok(apps)
    }
}
