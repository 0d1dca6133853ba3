//! Membership domain
//!
//! Membership rows tie users (or not-yet-registered email invitees) to
//! projects with a role and a lifecycle status.

mod entity;
mod repository;

pub use entity::{MemberIdentity, MemberRole, Membership, MembershipStatus};
pub use repository::MembershipRepository;
