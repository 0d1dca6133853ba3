//! Project domain
//!
//! Project entity, identifier, repository trait, and validation.

mod entity;
mod repository;
mod validation;

pub use entity::{Project, ProjectId};
pub use repository::ProjectRepository;
pub use validation::{validate_project_id, validate_project_name, ProjectValidationError};
