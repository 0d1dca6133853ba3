//! Authorization infrastructure

mod gate;

pub use gate::{AdminContext, AdminGate};
