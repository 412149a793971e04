//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! The company and user repositories share the reference store they are
//! built from, so relationship navigation behaves like the join-table
//! adapters: dangling ids are dropped and declared order is kept. Users see
//! company deletes the way the cascading foreign keys make them: ids of
//! companies that no longer exist disappear from their lists.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    name_key, normalize_name, Branch, BranchId, Company, CompanyId, Location, LocationId, Skill,
    SkillId, User, UserId,
};
use crate::domain::ports::{CompanyRepository, ReferenceRepository, UserRepository};
use crate::error::DomainError;

// ============================================================================
// In-Memory Reference Repository
// ============================================================================

#[derive(Default, Clone)]
pub struct InMemoryReferenceRepository {
    branches: Arc<RwLock<Vec<Branch>>>,
    locations: Arc<RwLock<Vec<Location>>>,
    skills: Arc<RwLock<Vec<Skill>>>,
}

impl InMemoryReferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a branch for testing
    pub fn with_branch(self, branch: Branch) -> Self {
        self.branches.write().unwrap().push(branch);
        self
    }

    /// Pre-populate with a location for testing
    pub fn with_location(self, location: Location) -> Self {
        self.locations.write().unwrap().push(location);
        self
    }

    /// Pre-populate with a skill for testing
    pub fn with_skill(self, skill: Skill) -> Self {
        self.skills.write().unwrap().push(skill);
        self
    }

    /// Number of branches stored, for asserting on find-or-create
    pub fn branch_count(&self) -> usize {
        self.branches.read().unwrap().len()
    }

    pub fn skill_count(&self) -> usize {
        self.skills.read().unwrap().len()
    }
}

/// Find-or-create by name key. New rows get the next free id.
fn resolve_names<T: Clone>(
    store: &RwLock<Vec<T>>,
    names: &[String],
    name_of: impl Fn(&T) -> &str,
    id_of: impl Fn(&T) -> i32,
    make: impl Fn(i32, String) -> T,
) -> Vec<T> {
    let mut rows = store.write().unwrap();
    let mut resolved = Vec::with_capacity(names.len());

    for name in names.iter().map(|n| normalize_name(n)) {
        if name.is_empty() {
            continue;
        }
        let key = name_key(&name);
        let existing = rows.iter().find(|row| name_key(name_of(row)) == key).cloned();
        let row = match existing {
            Some(row) => row,
            None => {
                let next_id = rows.iter().map(&id_of).max().unwrap_or(0) + 1;
                let row = make(next_id, name);
                rows.push(row.clone());
                row
            }
        };
        resolved.push(row);
    }

    resolved
}

fn find_ids<T: Clone>(store: &RwLock<Vec<T>>, ids: &[i32], id_of: impl Fn(&T) -> i32) -> Vec<T> {
    let rows = store.read().unwrap();
    ids.iter()
        .filter_map(|id| rows.iter().find(|row| id_of(row) == *id).cloned())
        .collect()
}

#[async_trait]
impl ReferenceRepository for InMemoryReferenceRepository {
    async fn resolve_branches(&self, names: &[String]) -> Result<Vec<Branch>, DomainError> {
        Ok(resolve_names(
            &self.branches,
            names,
            |b| b.name.as_str(),
            |b| b.id.0,
            |id, name| Branch {
                id: BranchId(id),
                name,
            },
        ))
    }

    async fn resolve_locations(&self, names: &[String]) -> Result<Vec<Location>, DomainError> {
        Ok(resolve_names(
            &self.locations,
            names,
            |l| l.name.as_str(),
            |l| l.id.0,
            |id, name| Location {
                id: LocationId(id),
                name,
            },
        ))
    }

    async fn resolve_skills(&self, names: &[String]) -> Result<Vec<Skill>, DomainError> {
        Ok(resolve_names(
            &self.skills,
            names,
            |s| s.name.as_str(),
            |s| s.id.0,
            |id, name| Skill {
                id: SkillId(id),
                name,
            },
        ))
    }

    async fn find_branches(&self, ids: &[BranchId]) -> Result<Vec<Branch>, DomainError> {
        let ids: Vec<i32> = ids.iter().map(|id| id.0).collect();
        Ok(find_ids(&self.branches, &ids, |b| b.id.0))
    }

    async fn find_locations(&self, ids: &[LocationId]) -> Result<Vec<Location>, DomainError> {
        let ids: Vec<i32> = ids.iter().map(|id| id.0).collect();
        Ok(find_ids(&self.locations, &ids, |l| l.id.0))
    }

    async fn find_skills(&self, ids: &[SkillId]) -> Result<Vec<Skill>, DomainError> {
        let ids: Vec<i32> = ids.iter().map(|id| id.0).collect();
        Ok(find_ids(&self.skills, &ids, |s| s.id.0))
    }
}

// ============================================================================
// In-Memory Company Repository
// ============================================================================

#[derive(Default, Clone)]
pub struct InMemoryCompanyRepository {
    companies: Arc<RwLock<HashMap<CompanyId, Company>>>,
    references: InMemoryReferenceRepository,
}

impl InMemoryCompanyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share a reference store so navigation can resolve names
    pub fn with_references(references: &InMemoryReferenceRepository) -> Self {
        Self {
            companies: Arc::default(),
            references: references.clone(),
        }
    }

    /// Pre-populate with a company for testing
    pub fn with_company(self, company: Company) -> Self {
        self.companies
            .write()
            .unwrap()
            .insert(company.id, company);
        self
    }

    fn get(&self, id: &CompanyId) -> Option<Company> {
        self.companies.read().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, DomainError> {
        Ok(self.get(id))
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Company>, DomainError> {
        let companies = self.companies.read().unwrap();
        let mut all: Vec<Company> = companies.values().cloned().collect();
        all.sort_by_key(|c| c.id);
        Ok(all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn insert(&self, company: &Company) -> Result<Company, DomainError> {
        let mut companies = self.companies.write().unwrap();
        if companies.contains_key(&company.id) {
            return Err(DomainError::AlreadyExists(format!(
                "Company {} already exists",
                company.id
            )));
        }
        companies.insert(company.id, company.clone());
        Ok(company.clone())
    }

    async fn update(&self, company: &Company) -> Result<Company, DomainError> {
        let mut companies = self.companies.write().unwrap();
        match companies.get_mut(&company.id) {
            Some(existing) => {
                *existing = company.clone();
                Ok(company.clone())
            }
            None => Err(DomainError::NotFound(format!(
                "Company {} not found",
                company.id
            ))),
        }
    }

    async fn delete(&self, id: &CompanyId) -> Result<(), DomainError> {
        match self.companies.write().unwrap().remove(id) {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound(format!("Company {} not found", id))),
        }
    }

    async fn eligible_branches(&self, id: &CompanyId) -> Result<Vec<Branch>, DomainError> {
        match self.get(id) {
            Some(company) => self.references.find_branches(&company.eligible_branches).await,
            None => Ok(Vec::new()),
        }
    }

    async fn locations(&self, id: &CompanyId) -> Result<Vec<Location>, DomainError> {
        match self.get(id) {
            Some(company) => self.references.find_locations(&company.locations).await,
            None => Ok(Vec::new()),
        }
    }
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    companies: InMemoryCompanyRepository,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share the company store (and through it the reference store)
    pub fn with_companies(companies: &InMemoryCompanyRepository) -> Self {
        Self {
            users: Arc::default(),
            companies: companies.clone(),
        }
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.users.write().unwrap().insert(user.id, user);
        self
    }

    /// Snapshot of a stored user, bypassing the trait
    pub fn stored(&self, id: &UserId) -> Option<User> {
        self.sweep_deleted_companies();
        self.users.read().unwrap().get(id).cloned()
    }

    /// Drop ids of deleted companies from every user's lists
    fn sweep_deleted_companies(&self) {
        let mut users = self.users.write().unwrap();
        for user in users.values_mut() {
            user.upcoming.retain(|id| self.companies.get(id).is_some());
            user.applied_companies
                .retain(|id| self.companies.get(id).is_some());
        }
    }

    fn resolve_companies(&self, ids: &[CompanyId]) -> Vec<Company> {
        ids.iter().filter_map(|id| self.companies.get(id)).collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.stored(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.sweep_deleted_companies();
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<User>, DomainError> {
        self.sweep_deleted_companies();
        let users = self.users.read().unwrap();
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| u.id.0);
        Ok(all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn insert(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap();
        if users.contains_key(&user.id) {
            return Err(DomainError::AlreadyExists(format!(
                "User {} already exists",
                user.id
            )));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict(format!(
                "User {} conflicts with an existing user",
                user.id
            )));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap();
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(DomainError::Conflict(format!(
                "User {} conflicts with an existing user",
                user.id
            )));
        }
        match users.get_mut(&user.id) {
            Some(existing) => {
                // Counters and company lists stay as stored
                *existing = User {
                    total_applications: existing.total_applications,
                    interviews: existing.interviews,
                    upcoming: std::mem::take(&mut existing.upcoming),
                    applied_companies: std::mem::take(&mut existing.applied_companies),
                    ..user.clone()
                };
                Ok(existing.clone())
            }
            None => Err(DomainError::NotFound(format!("User {} not found", user.id))),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        match self.users.write().unwrap().remove(id) {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound(format!("User {} not found", id))),
        }
    }

    async fn skills(&self, id: &UserId) -> Result<Vec<Skill>, DomainError> {
        match self.stored(id) {
            Some(user) => self.companies.references.find_skills(&user.skills).await,
            None => Ok(Vec::new()),
        }
    }

    async fn upcoming(&self, id: &UserId) -> Result<Vec<Company>, DomainError> {
        Ok(self
            .stored(id)
            .map(|user| self.resolve_companies(&user.upcoming))
            .unwrap_or_default())
    }

    async fn applied_companies(&self, id: &UserId) -> Result<Vec<Company>, DomainError> {
        Ok(self
            .stored(id)
            .map(|user| self.resolve_companies(&user.applied_companies))
            .unwrap_or_default())
    }

    async fn record_application(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
    ) -> Result<User, DomainError> {
        if self.companies.get(company_id).is_none() {
            return Err(DomainError::NotFound(format!(
                "Company {} not found",
                company_id
            )));
        }

        self.sweep_deleted_companies();
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", user_id)))?;

        if user.has_applied_to(company_id) {
            return Err(DomainError::Conflict(format!(
                "User {} has already applied to company {}",
                user_id, company_id
            )));
        }

        user.applied_companies.push(*company_id);
        user.upcoming.retain(|id| id != company_id);
        user.total_applications += 1;
        Ok(user.clone())
    }

    async fn replace_upcoming(
        &self,
        user_id: &UserId,
        companies: &[CompanyId],
    ) -> Result<Vec<CompanyId>, DomainError> {
        self.sweep_deleted_companies();
        let mut users = self.users.write().unwrap();
        match users.get_mut(user_id) {
            Some(user) => {
                user.upcoming = companies
                    .iter()
                    .filter(|id| !user.applied_companies.contains(*id))
                    .copied()
                    .collect();
                Ok(user.upcoming.clone())
            }
            None => Err(DomainError::NotFound(format!("User {} not found", user_id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_company, test_user};

    #[tokio::test]
    async fn resolve_reuses_existing_names_case_insensitively() {
        let refs = InMemoryReferenceRepository::new();

        let first = refs
            .resolve_branches(&["CSE".to_string(), "  ece ".to_string()])
            .await
            .unwrap();
        let second = refs
            .resolve_branches(&["cse".to_string(), "".to_string()])
            .await
            .unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first[1].name, "ece");
        assert_eq!(second, vec![first[0].clone()]);
        assert_eq!(refs.branch_count(), 2);
    }

    #[tokio::test]
    async fn user_navigation_skips_deleted_companies() {
        let companies = InMemoryCompanyRepository::new()
            .with_company(test_company(1))
            .with_company(test_company(2));
        let mut user = test_user(10);
        user.upcoming = vec![CompanyId(2), CompanyId(1)];
        let users = InMemoryUserRepository::with_companies(&companies).with_user(user);

        companies.delete(&CompanyId(1)).await.unwrap();

        let upcoming = users.upcoming(&UserId(10)).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, CompanyId(2));
    }

    #[tokio::test]
    async fn update_leaves_counters_and_company_lists_alone() {
        let companies = InMemoryCompanyRepository::new().with_company(test_company(1));
        let users = InMemoryUserRepository::with_companies(&companies).with_user(test_user(10));
        let snapshot = users.stored(&UserId(10)).unwrap();

        users
            .record_application(&UserId(10), &CompanyId(1))
            .await
            .unwrap();

        let mut edited = snapshot;
        edited.full_name = "Edited".to_string();
        let stored = users.update(&edited).await.unwrap();

        assert_eq!(stored.full_name, "Edited");
        assert_eq!(stored.applied_companies, vec![CompanyId(1)]);
        assert_eq!(stored.total_applications, 1);
    }

    #[tokio::test]
    async fn replace_upcoming_skips_applied_companies() {
        let companies = InMemoryCompanyRepository::new()
            .with_company(test_company(1))
            .with_company(test_company(2));
        let mut user = test_user(10);
        user.applied_companies = vec![CompanyId(1)];
        let users = InMemoryUserRepository::with_companies(&companies).with_user(user);

        let stored = users
            .replace_upcoming(&UserId(10), &[CompanyId(1), CompanyId(2)])
            .await
            .unwrap();

        assert_eq!(stored, vec![CompanyId(2)]);
        assert_eq!(users.stored(&UserId(10)).unwrap().upcoming, stored);
    }

    #[tokio::test]
    async fn company_delete_cascades_to_applied_list() {
        let companies = InMemoryCompanyRepository::new()
            .with_company(test_company(1))
            .with_company(test_company(2));
        let mut user = test_user(10);
        user.applied_companies = vec![CompanyId(1), CompanyId(2)];
        let users = InMemoryUserRepository::with_companies(&companies).with_user(user);

        companies.delete(&CompanyId(1)).await.unwrap();

        let found = users.find_by_id(&UserId(10)).await.unwrap().unwrap();
        assert_eq!(found.applied_companies, vec![CompanyId(2)]);
        assert!(!found.has_applied_to(&CompanyId(1)));
    }

    #[tokio::test]
    async fn names_differing_only_in_case_share_a_row() {
        let refs = InMemoryReferenceRepository::new();
        let first = refs.resolve_skills(&["Rust".to_string()]).await.unwrap();
        let second = refs.resolve_skills(&["RUST ".to_string()]).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(refs.skill_count(), 1);
    }
}
