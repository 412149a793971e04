//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and the repository ports.

pub mod company_service;
pub mod user_service;

pub use company_service::{CompanyInput, CompanyService};
pub use user_service::{UserInput, UserService};
