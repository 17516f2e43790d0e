use async_trait::async_trait;
use tracing::{info, warn};

use fleetwatch_domain::{AlertMessage, AlertSeverity, MonitorError};
use fleetwatch_ports::NotifierPort;

/// Writes alerts to the service log. Used when no channel is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl NotifierPort for LogNotifier {
    fn channel(&self) -> &str {
        "log"
    }

    async fn send(&self, message: &AlertMessage) -> Result<(), MonitorError> {
        match message.severity {
            AlertSeverity::Problem => {
                warn!(cluster = %message.cluster, "{}", message.text())
            }
            AlertSeverity::Recovered => {
                info!(cluster = %message.cluster, "{}", message.text())
            }
        }
        Ok(())
    }
}
