//! Notification domain
//!
//! The outbound delivery trait and its payload types. Transports live in
//! the infrastructure layer.

mod notifier;

pub use notifier::{InviteNotification, Notifier, ResetNotification};

#[cfg(test)]
pub use notifier::mock::RecordingNotifier;
