//! SeaORM entity definitions
//!
//! One module per table. The domain layer never sees these types directly;
//! the PostgreSQL adapters convert between them and `domain::entities`.

pub mod prelude;

pub mod branches;
pub mod companies;
pub mod company_eligible_branches;
pub mod company_locations;
pub mod locations;
pub mod skills;
pub mod user_applied_companies;
pub mod user_skills;
pub mod user_upcoming_companies;
pub mod users;
