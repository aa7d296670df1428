//! # Society Core
//! 
//! Domain records, validation rules, the role gate, services and repository
//! ports for the society management application.

pub mod authorization;
pub mod domain;
pub mod error;
pub mod notification;
pub mod repositories;
pub mod services;
pub mod validation;

// Re-export domain entities
pub use domain::*;
pub use authorization::{authorize, Access, CurrentUser};
pub use error::DomainError;
pub use validation::{ValidationReport, Violation};
