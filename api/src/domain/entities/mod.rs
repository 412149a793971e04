//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod company;
pub mod reference;
pub mod user;

pub use company::{Company, CompanyDetails, CompanyId};
pub use reference::{
    name_key, normalize_name, Branch, BranchId, Location, LocationId, Skill, SkillId,
};
pub use user::{User, UserId, UserProfile};
