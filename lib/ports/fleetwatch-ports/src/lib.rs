//! I/O seams of the monitor.

use async_trait::async_trait;

use fleetwatch_domain::{AlertMessage, Application, Cluster, MonitorError};

/// Remote controller API.
#[async_trait]
pub trait ClusterApiPort: Send + Sync {
    /// Exchanges the cluster's credentials for a session token.
    ///
    /// Fails with [`MonitorError::Authentication`] when the exchange is
    /// rejected or the response carries no token.
    async fn login(&self, cluster: &Cluster) -> Result<String, MonitorError>;

    /// Lists applications using a previously obtained token.
    ///
    /// A well-formed response without items yields an empty vector.
    async fn list_applications(
        &self,
        cluster: &Cluster,
        token: &str,
    ) -> Result<Vec<Application>, MonitorError>;
}

/// Messaging sink for alerts and recovery notices.
#[async_trait]
pub trait NotifierPort: Send + Sync {
    /// Short label used in logs, e.g. `webhook` or `ntfy`.
    fn channel(&self) -> &str;

    async fn send(&self, message: &AlertMessage) -> Result<(), MonitorError>;
}
