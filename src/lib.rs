//! Fleet health monitor service: configuration wiring and telemetry.

pub mod telemetry;
pub mod wiring;

pub use wiring::{build_monitor, build_notifier, config_path};
