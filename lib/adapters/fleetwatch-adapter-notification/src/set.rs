use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use fleetwatch_domain::{AlertMessage, MonitorError};
use fleetwatch_ports::NotifierPort;

use crate::logger::LogNotifier;

/// Delivers every message to all configured channels.
///
/// One channel failing does not stop delivery to the others; the send only
/// fails when no channel accepted the message.
#[derive(Clone)]
pub struct NotifierSet {
    channels: Vec<Arc<dyn NotifierPort>>,
}

impl NotifierSet {
    /// An empty list falls back to logging.
    pub fn new(channels: Vec<Arc<dyn NotifierPort>>) -> Self {
        if channels.is_empty() {
            return Self {
                channels: vec![Arc::new(LogNotifier)],
            };
        }
        Self { channels }
    }

    pub fn channels(&self) -> Vec<String> {
        self.channels
            .iter()
            .map(|channel| channel.channel().to_string())
            .collect()
    }
}

#[async_trait]
impl NotifierPort for NotifierSet {
    fn channel(&self) -> &str {
        "all"
    }

    async fn send(&self, message: &AlertMessage) -> Result<(), MonitorError> {
        let mut failures = Vec::new();
        for channel in &self.channels {
            if let Err(err) = channel.send(message).await {
                warn!(channel = channel.channel(), error = %err, "notification channel failed");
                failures.push(err.to_string());
            }
        }
        if failures.len() == self.channels.len() {
            return Err(MonitorError::dispatch(self.channel(), failures.join("; ")));
        }
        Ok(())
    }
}
