//! In-memory fakes for the ports.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use fleetwatch_domain::{AlertMessage, Application, Cluster, MonitorError};
use fleetwatch_ports::{ClusterApiPort, NotifierPort};

pub fn cluster(name: &str) -> Cluster {
    Cluster::new(name, format!("https://{name}.example.com"), "admin", "secret")
}

#[derive(Clone)]
pub enum Listing {
    Apps(Vec<Application>),
    FetchError,
    AuthError,
    Panic,
}

#[derive(Default)]
pub struct FakeClusterApi {
    listings: Mutex<HashMap<String, Listing>>,
    rejected_logins: Mutex<Vec<String>>,
    logins: AtomicUsize,
    lists: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl FakeClusterApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every listing call waits on `gate` before answering.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn with(self, cluster: &str, listing: Listing) -> Self {
        self.set(cluster, listing);
        self
    }

    pub fn set(&self, cluster: &str, listing: Listing) {
        self.listings
            .lock()
            .unwrap()
            .insert(cluster.to_string(), listing);
    }

    pub fn reject_login(&self, cluster: &str) {
        self.rejected_logins.lock().unwrap().push(cluster.to_string());
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterApiPort for FakeClusterApi {
    async fn login(&self, cluster: &Cluster) -> Result<String, MonitorError> {
        let attempt = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
        if self.rejected_logins.lock().unwrap().contains(&cluster.name) {
            return Err(MonitorError::auth(&cluster.name, "401 Unauthorized"));
        }
        Ok(format!("{}-token-{attempt}", cluster.name))
    }

    async fn list_applications(
        &self,
        cluster: &Cluster,
        _token: &str,
    ) -> Result<Vec<Application>, MonitorError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let listing = self.listings.lock().unwrap().get(&cluster.name).cloned();
        match listing {
            Some(Listing::Apps(apps)) => Ok(apps),
            Some(Listing::FetchError) => Err(MonitorError::fetch(&cluster.name, "503")),
            Some(Listing::AuthError) => Err(MonitorError::auth(&cluster.name, "token revoked")),
            Some(Listing::Panic) => panic!("listing exploded for {}", cluster.name),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<AlertMessage>>,
    fail: bool,
    panic_for: Option<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Panics on messages about `cluster`, records everything else.
    pub fn panicking_for(cluster: &str) -> Self {
        Self {
            panic_for: Some(cluster.to_string()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<AlertMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotifierPort for RecordingNotifier {
    fn channel(&self) -> &str {
        "recording"
    }

    async fn send(&self, message: &AlertMessage) -> Result<(), MonitorError> {
        if self.panic_for.as_deref() == Some(message.cluster.as_str()) {
            panic!("notifier exploded for {}", message.cluster);
        }
        self.sent.lock().unwrap().push(message.clone());
        if self.fail {
            return Err(MonitorError::dispatch("recording", "sink unreachable"));
        }
        Ok(())
    }
}
