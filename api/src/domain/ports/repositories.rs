//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//!
//! Records are loaded and saved by identifier. Relationships are stored as
//! ordered id lists on the records and navigated with explicit calls.

use async_trait::async_trait;

use crate::domain::entities::{
    Branch, BranchId, Company, CompanyId, Location, LocationId, Skill, SkillId, User, UserId,
};
use crate::error::DomainError;

/// Repository for Company records
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Find a company by ID
    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, DomainError>;

    /// List companies ordered by ID
    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Company>, DomainError>;

    /// Persist a new company under its own ID
    ///
    /// Fails with `AlreadyExists` if the ID is taken.
    async fn insert(&self, company: &Company) -> Result<Company, DomainError>;

    /// Overwrite an existing company, including its relationships
    ///
    /// Fails with `NotFound` if no company has this ID.
    async fn update(&self, company: &Company) -> Result<Company, DomainError>;

    /// Delete a company and its relationship rows
    async fn delete(&self, id: &CompanyId) -> Result<(), DomainError>;

    /// Navigate `eligible_branches`, in declared order
    async fn eligible_branches(&self, id: &CompanyId) -> Result<Vec<Branch>, DomainError>;

    /// Navigate `locations`, in declared order
    async fn locations(&self, id: &CompanyId) -> Result<Vec<Location>, DomainError>;
}

/// Repository for User records
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// List users ordered by ID
    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<User>, DomainError>;

    /// Persist a new user under its own ID
    ///
    /// Fails with `AlreadyExists` if the ID is taken.
    async fn insert(&self, user: &User) -> Result<User, DomainError>;

    /// Overwrite a user's own fields and skills
    ///
    /// Counters and the company relationships are left as stored, so a
    /// concurrent `record_application` is never undone. Returns the user as
    /// stored after the write. Fails with `NotFound` if no user has this ID.
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user and its relationship rows
    async fn delete(&self, id: &UserId) -> Result<(), DomainError>;

    /// Navigate `skills`, in declared order
    async fn skills(&self, id: &UserId) -> Result<Vec<Skill>, DomainError>;

    /// Navigate `upcoming`, in declared order
    async fn upcoming(&self, id: &UserId) -> Result<Vec<Company>, DomainError>;

    /// Navigate `applied_companies`, in declared order
    async fn applied_companies(&self, id: &UserId) -> Result<Vec<Company>, DomainError>;

    /// Record an application atomically
    ///
    /// Appends the company to `applied_companies`, drops it from `upcoming`
    /// and increments `total_applications`. Returns the updated user.
    async fn record_application(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
    ) -> Result<User, DomainError>;

    /// Replace the `upcoming` relationship
    ///
    /// Companies the user has already applied to at write time are skipped.
    /// Returns the ids actually stored, in order.
    async fn replace_upcoming(
        &self,
        user_id: &UserId,
        companies: &[CompanyId],
    ) -> Result<Vec<CompanyId>, DomainError>;
}

/// Repository for the named reference entities (branches, locations, skills)
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    /// Find or create branches by name, preserving input order
    async fn resolve_branches(&self, names: &[String]) -> Result<Vec<Branch>, DomainError>;

    /// Find or create locations by name, preserving input order
    async fn resolve_locations(&self, names: &[String]) -> Result<Vec<Location>, DomainError>;

    /// Find or create skills by name, preserving input order
    async fn resolve_skills(&self, names: &[String]) -> Result<Vec<Skill>, DomainError>;

    /// Look up branches by ID, preserving input order. Unknown IDs are skipped.
    async fn find_branches(&self, ids: &[BranchId]) -> Result<Vec<Branch>, DomainError>;

    /// Look up locations by ID, preserving input order. Unknown IDs are skipped.
    async fn find_locations(&self, ids: &[LocationId]) -> Result<Vec<Location>, DomainError>;

    /// Look up skills by ID, preserving input order. Unknown IDs are skipped.
    async fn find_skills(&self, ids: &[SkillId]) -> Result<Vec<Skill>, DomainError>;
}
