use anyhow::{Context, Result};
use tracing::info;

use fleetwatch::{build_monitor, config_path, telemetry};
use fleetwatch_domain::FleetwatchConfig;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init()?;

    let path = config_path();
    let config = FleetwatchConfig::load_from_path(&path)
        .with_context(|| format!("failed to load config at {}", path.display()))?;
    info!(path = %path.display(), clusters = config.clusters.len(), "configuration loaded");

    let monitor = build_monitor(&config)?;
    let scheduler = monitor.start();

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    scheduler.abort();
    let status = monitor.update_status();
    let snapshot = monitor.global_state();
    info!(
        last_update = ?status.last_update,
        total = snapshot.metrics.total_apps,
        healthy = snapshot.metrics.healthy_apps,
        "shutting down"
    );
    Ok(())
}
