use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, warn};

use fleetwatch_domain::{Cluster, ClusterResult};

use crate::poller::ClusterPoller;

/// Polls every cluster concurrently and returns one result per cluster, in
/// configuration order.
///
/// Each cluster runs in its own task, so an error or a panic while polling
/// one cluster only empties that cluster's result.
pub async fn collect_all(poller: &Arc<ClusterPoller>, clusters: &[Cluster]) -> Vec<ClusterResult> {
    let handles: Vec<_> = clusters
        .iter()
        .cloned()
        .map(|cluster| {
            let poller = Arc::clone(poller);
            tokio::spawn(async move { poller.fetch_applications(&cluster).await })
        })
        .collect();

    let mut results = Vec::with_capacity(clusters.len());
    for (cluster, handle) in clusters.iter().zip(handles) {
        let applications = match handle.await {
            Ok(Ok(apps)) => {
                if apps.is_empty() {
                    warn!(cluster = %cluster.name, "no applications collected for cluster");
                }
                apps
            }
            Ok(Err(err)) => {
                error!(cluster = %cluster.name, error = %err, "failed to poll cluster");
                Vec::new()
            }
            Err(err) => {
                error!(cluster = %cluster.name, error = %err, "cluster poll task aborted");
                Vec::new()
            }
        };
        results.push(ClusterResult::new(cluster, applications));
    }
    results
}

/// Drops applications whose name is on the exclusion list.
pub fn exclude_applications(results: &mut [ClusterResult], excluded: &HashSet<String>) {
    if excluded.is_empty() {
        return;
    }
    for result in results {
        result.applications.retain(|app| !excluded.contains(&app.name));
    }
}
