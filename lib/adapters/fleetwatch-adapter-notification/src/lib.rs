//! Messaging sinks for alerts and recovery notices.

pub mod logger;
pub mod ntfy;
pub mod set;
pub mod webhook;

pub use logger::LogNotifier;
pub use ntfy::NtfyNotifier;
pub use set::NotifierSet;
pub use webhook::WebhookNotifier;
