//! Notification infrastructure
//!
//! Transports for the domain Notifier trait.

mod noop;
mod webhook;

pub use noop::NoopNotifier;
pub use webhook::WebhookNotifier;
