use thiserror::Error;

/// Failure taxonomy of the monitor.
///
/// `Authentication` and `Fetch` never leave the per-cluster boundary;
/// `Busy` only reaches callers of a manual refresh; `Dispatch` is logged.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("authentication against cluster '{cluster}' failed: {reason}")]
    Authentication { cluster: String, reason: String },

    #[error("fetching applications from cluster '{cluster}' failed: {reason}")]
    Fetch { cluster: String, reason: String },

    #[error("a refresh cycle is already in progress")]
    Busy,

    #[error("delivering notification via {channel} failed: {reason}")]
    Dispatch { channel: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl MonitorError {
    pub fn auth(cluster: &str, reason: impl ToString) -> Self {
        Self::Authentication {
            cluster: cluster.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn fetch(cluster: &str, reason: impl ToString) -> Self {
        Self::Fetch {
            cluster: cluster.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn dispatch(channel: &str, reason: impl ToString) -> Self {
        Self::Dispatch {
            channel: channel.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }
}
