//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod company_repo;
pub mod reference_repo;
pub mod schema;
pub mod user_repo;


pub use company_repo::PostgresCompanyRepository;
pub use reference_repo::PostgresReferenceRepository;
pub use schema::ensure_schema;
pub use user_repo::PostgresUserRepository;

use crate::error::DomainError;

/// Join-table position for the list element at `index`
pub(crate) fn join_position(index: usize) -> Result<i32, DomainError> {
    i32::try_from(index).map_err(|_| {
        DomainError::Validation(format!(
            "Relationship lists hold at most {} entries",
            i32::MAX
        ))
    })
}
