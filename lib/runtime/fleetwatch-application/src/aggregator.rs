use fleetwatch_domain::{ClusterResult, HealthStatus, Metrics, SyncStatus};

/// Reduces a batch of cluster results into fleet-wide counters.
///
/// Health and sync are counted independently. `Missing` has no counter of
/// its own and is folded into `unknown_apps`; sync `Unknown` is not counted.
pub fn aggregate(results: &[ClusterResult]) -> Metrics {
    let mut metrics = Metrics::default();
    for app in results.iter().flat_map(|result| &result.applications) {
        metrics.total_apps += 1;

        match app.health {
            HealthStatus::Healthy => metrics.healthy_apps += 1,
            HealthStatus::Degraded => metrics.degraded_apps += 1,
            HealthStatus::Failed => metrics.failed_apps += 1,
            HealthStatus::Unknown | HealthStatus::Missing => metrics.unknown_apps += 1,
        }

        match app.sync {
            SyncStatus::Synced => metrics.synced_apps += 1,
            SyncStatus::OutOfSync => metrics.out_of_sync_apps += 1,
            SyncStatus::Processing => metrics.processing_apps += 1,
            SyncStatus::Unknown => {}
        }
    }
    metrics
}
