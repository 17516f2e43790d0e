//! Builds a [`Monitor`] and its adapters from configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use fleetwatch_adapter_argocd::ArgoCdClient;
use fleetwatch_adapter_notification::{NotifierSet, NtfyNotifier, WebhookNotifier};
use fleetwatch_application::{Monitor, MonitorSettings};
use fleetwatch_domain::{FleetwatchConfig, NotificationChannelConfig, NotificationsConfig};
use fleetwatch_ports::NotifierPort;

/// `FLEETWATCH_CONFIG_PATH`, else `~/.fleetwatch/config.yaml`, else the
/// working directory.
pub fn config_path() -> PathBuf {
    resolve_config_path(
        std::env::var("FLEETWATCH_CONFIG_PATH").ok(),
        std::env::var("HOME").ok(),
    )
}

fn resolve_config_path(explicit: Option<String>, home: Option<String>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }
    if let Some(home) = home {
        return Path::new(&home).join(".fleetwatch").join("config.yaml");
    }
    PathBuf::from("fleetwatch-config.yaml")
}

pub fn build_notifier(config: &NotificationsConfig, timeout: Duration) -> Result<NotifierSet> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build notification HTTP client")?;

    let channels = config
        .channels
        .iter()
        .map(|channel| -> Arc<dyn NotifierPort> {
            match channel {
                NotificationChannelConfig::Webhook { url } => {
                    Arc::new(WebhookNotifier::new(client.clone(), url))
                }
                NotificationChannelConfig::Ntfy { url, topic } => {
                    Arc::new(NtfyNotifier::new(client.clone(), url, topic))
                }
            }
        })
        .collect();
    Ok(NotifierSet::new(channels))
}

pub fn build_monitor(config: &FleetwatchConfig) -> Result<Monitor> {
    let clusters = config
        .resolve_clusters()
        .context("failed to resolve cluster credentials")?;
    let api = ArgoCdClient::new(config.request_timeout()).context("failed to build cluster client")?;
    let notifier = build_notifier(&config.notifications, config.request_timeout())?;
    tracing::info!(
        clusters = clusters.len(),
        channels = ?notifier.channels(),
        "monitor configured"
    );

    Ok(Monitor::new(
        clusters,
        Arc::new(api),
        Arc::new(notifier),
        MonitorSettings::from_config(config),
    ))
}
