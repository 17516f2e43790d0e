//! Fleet monitor core: polling, caching, aggregation and alerting.

pub mod aggregator;
pub mod alerts;
pub mod collector;
pub mod credentials;
pub mod monitor;
pub mod poller;
pub mod snapshot_cache;

#[cfg(test)]
mod testing;

pub use aggregator::aggregate;
pub use alerts::AlertStateMachine;
pub use collector::collect_all;
pub use credentials::CredentialCache;
pub use monitor::{Monitor, MonitorSettings};
pub use poller::ClusterPoller;
pub use snapshot_cache::SnapshotCache;
