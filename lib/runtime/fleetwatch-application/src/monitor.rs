//! Scheduler and orchestrator for refresh cycles.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{error, info, warn};

use fleetwatch_domain::{
    AlertMessage, Cluster, FleetwatchConfig, GlobalSnapshot, MonitorError, UpdateStatus,
};
use fleetwatch_ports::{ClusterApiPort, NotifierPort};

use crate::aggregator::aggregate;
use crate::alerts::AlertStateMachine;
use crate::collector::{collect_all, exclude_applications};
use crate::credentials::CredentialCache;
use crate::poller::ClusterPoller;
use crate::snapshot_cache::SnapshotCache;

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub refresh_interval: Duration,
    pub alert_interval: Duration,
    pub session_ttl: Duration,
    pub snapshot_ttl: Duration,
    pub excluded_apps: Vec<String>,
}

impl MonitorSettings {
    pub fn from_config(config: &FleetwatchConfig) -> Self {
        Self {
            refresh_interval: config.refresh_interval(),
            alert_interval: config.alert_interval(),
            session_ttl: config.session_ttl(),
            snapshot_ttl: config.snapshot_ttl(),
            excluded_apps: config.excluded_apps.clone(),
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(300),
            alert_interval: Duration::from_secs(3600),
            session_ttl: Duration::from_secs(23 * 3600),
            snapshot_ttl: Duration::from_secs(600),
            excluded_apps: Vec::new(),
        }
    }
}

struct MonitorInner {
    clusters: Vec<Cluster>,
    poller: Arc<ClusterPoller>,
    snapshots: SnapshotCache,
    alerts: Mutex<AlertStateMachine>,
    notifier: Arc<dyn NotifierPort>,
    excluded: HashSet<String>,
    refresh_interval: Duration,
    busy: AtomicBool,
}

/// Clears the busy flag when the cycle ends, however it ends.
struct BusyGuard {
    inner: Arc<MonitorInner>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.inner.busy.store(false, Ordering::Release);
    }
}

/// Owns all monitor state and runs at most one refresh cycle at a time.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

impl Monitor {
    pub fn new(
        clusters: Vec<Cluster>,
        api: Arc<dyn ClusterApiPort>,
        notifier: Arc<dyn NotifierPort>,
        settings: MonitorSettings,
    ) -> Self {
        let credentials = CredentialCache::new(Arc::clone(&api), settings.session_ttl);
        let poller = Arc::new(ClusterPoller::new(api, credentials));
        let alerts = AlertStateMachine::new(
            settings.alert_interval,
            settings.excluded_apps.iter().cloned(),
        );
        Self {
            inner: Arc::new(MonitorInner {
                clusters,
                poller,
                snapshots: SnapshotCache::new(settings.snapshot_ttl),
                alerts: Mutex::new(alerts),
                notifier,
                excluded: settings.excluded_apps.into_iter().collect(),
                refresh_interval: settings.refresh_interval,
                busy: AtomicBool::new(false),
            }),
        }
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.inner.clusters
    }

    pub fn global_state(&self) -> Arc<GlobalSnapshot> {
        self.inner.snapshots.get()
    }

    pub fn is_updating(&self) -> bool {
        self.inner.busy.load(Ordering::Acquire)
    }

    pub fn update_status(&self) -> UpdateStatus {
        self.update_status_at(Utc::now())
    }

    pub fn update_status_at(&self, now: DateTime<Utc>) -> UpdateStatus {
        let last_update = self.global_state().last_update;
        let next_update = last_update.and_then(|last| {
            last.checked_add_signed(TimeDelta::from_std(self.inner.refresh_interval).ok()?)
        });
        let remaining_seconds = next_update
            .map(|next| next.signed_duration_since(now).num_seconds().max(0) as u64)
            .unwrap_or(0);
        UpdateStatus {
            last_update,
            next_update,
            remaining_seconds,
            is_updating: self.is_updating(),
        }
    }

    /// Scheduled refresh. Silently skipped while another cycle runs.
    pub async fn refresh_once(&self) {
        match self.try_begin() {
            Some(guard) => {
                self.run_cycle(guard).await;
            }
            None => info!("refresh already in progress, skipping scheduled cycle"),
        }
    }

    /// Manual refresh. Fails with [`MonitorError::Busy`] while another cycle runs.
    ///
    /// If the cycle itself blows up, the last good snapshot is returned.
    pub async fn force_refresh(&self) -> Result<Arc<GlobalSnapshot>, MonitorError> {
        let guard = self.try_begin().ok_or(MonitorError::Busy)?;
        Ok(self
            .run_cycle(guard)
            .await
            .unwrap_or_else(|| self.global_state()))
    }

    /// Runs a cycle now, then every `period` until the task is dropped.
    pub async fn run(&self, period: Duration) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.refresh_once().await;
        }
    }

    pub fn start(&self) -> JoinHandle<()> {
        let monitor = self.clone();
        let period = self.inner.refresh_interval;
        info!(
            period_secs = period.as_secs(),
            clusters = monitor.clusters().len(),
            "starting monitor scheduler"
        );
        tokio::spawn(async move { monitor.run(period).await })
    }

    fn try_begin(&self) -> Option<BusyGuard> {
        self.inner
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                inner: Arc::clone(&self.inner),
            })
    }

    /// The cycle runs in its own task so that a panic anywhere in it is
    /// contained here; the guard moves with it and clears the flag on exit.
    async fn run_cycle(&self, guard: BusyGuard) -> Option<Arc<GlobalSnapshot>> {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let _guard = guard;
            inner.cycle().await
        });
        match handle.await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                error!(error = %err, "refresh cycle failed");
                None
            }
        }
    }
}

impl MonitorInner {
    async fn cycle(&self) -> Arc<GlobalSnapshot> {
        let started = Instant::now();
        info!(clusters = self.clusters.len(), "refresh cycle started");

        let mut results = collect_all(&self.poller, &self.clusters).await;
        exclude_applications(&mut results, &self.excluded);
        let metrics = aggregate(&results);

        let now = Utc::now();
        let snapshot = Arc::new(GlobalSnapshot {
            metrics,
            clusters: results,
            last_update: Some(now),
        });
        self.snapshots.set(Arc::clone(&snapshot));

        let messages = self.alerts.lock().await.evaluate(&snapshot.clusters, now);
        self.dispatch(&messages).await;

        info!(
            total = metrics.total_apps,
            healthy = metrics.healthy_apps,
            degraded = metrics.degraded_apps,
            out_of_sync = metrics.out_of_sync_apps,
            alerts = messages.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "refresh cycle finished"
        );
        snapshot
    }

    /// Each delivery runs in its own task, so a sink that panics on one
    /// cluster's alert still receives the alerts of the others.
    async fn dispatch(&self, messages: &[AlertMessage]) {
        for message in messages {
            let notifier = Arc::clone(&self.notifier);
            let delivery = message.clone();
            let outcome = tokio::spawn(async move { notifier.send(&delivery).await }).await;
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(
                    cluster = %message.cluster,
                    channel = self.notifier.channel(),
                    error = %err,
                    "failed to deliver alert"
                ),
                Err(err) => error!(
                    cluster = %message.cluster,
                    channel = self.notifier.channel(),
                    error = %err,
                    "alert delivery panicked"
                ),
            }
        }
    }
}
