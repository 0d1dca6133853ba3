//! Account recovery infrastructure

mod service;

pub use service::{RecoveryService, RecoveryServiceDeps};
