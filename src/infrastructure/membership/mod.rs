//! Membership infrastructure
//!
//! In-memory membership storage and the invitation lifecycle service.

mod repository;
mod service;

pub use repository::InMemoryMembershipRepository;
pub use service::{Ack, InviteCheck, MembershipService, MembershipServiceDeps};
