//! User service
//!
//! Handles candidate registration, profile updates, the application flow
//! and recomputation of the upcoming-companies list.

use std::sync::{Arc, OnceLock};

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;

use super::company_service::{load_details, MAX_CGPA};
use crate::domain::entities::{
    normalize_name, Company, CompanyId, User, UserId, UserProfile,
};
use crate::domain::ports::{CompanyRepository, ReferenceRepository, UserRepository};
use crate::error::{AppError, DomainError};

/// Page size used when scanning all companies
const SCAN_PAGE: u64 = 200;

/// Candidate fields as submitted by an administrator.
///
/// Counters and company relationships are not part of the input; they are
/// owned by the application flow.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub id: i32,
    pub full_name: String,
    pub roll_no: String,
    pub email: String,
    pub branch: String,
    pub cgpa: f64,
    #[serde(default)]
    pub phone_no: String,
    #[serde(default)]
    pub graduation_level: String,
    pub year: i32,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub resume: Option<serde_json::Value>,
}

impl UserInput {
    /// Check the field-level rules that do not need storage
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.full_name.trim().is_empty() {
            return Err(DomainError::Validation(
                "full_name must not be empty".to_string(),
            ));
        }
        if self.roll_no.trim().is_empty() {
            return Err(DomainError::Validation(
                "roll_no must not be empty".to_string(),
            ));
        }
        if !is_email(&self.email) {
            return Err(DomainError::Validation(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        if !(0.0..=MAX_CGPA).contains(&self.cgpa) {
            return Err(DomainError::Validation(format!(
                "cgpa must be between 0 and {}",
                MAX_CGPA
            )));
        }
        Ok(())
    }
}

fn is_email(value: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
        .is_match(value.trim())
}

/// Service for managing candidates
pub struct UserService<UR, CR, RR>
where
    UR: UserRepository + ?Sized,
    CR: CompanyRepository + ?Sized,
    RR: ReferenceRepository + ?Sized,
{
    users: Arc<UR>,
    companies: Arc<CR>,
    references: Arc<RR>,
}

impl<UR, CR, RR> UserService<UR, CR, RR>
where
    UR: UserRepository + ?Sized,
    CR: CompanyRepository + ?Sized,
    RR: ReferenceRepository + ?Sized,
{
    pub fn new(users: Arc<UR>, companies: Arc<CR>, references: Arc<RR>) -> Self {
        Self {
            users,
            companies,
            references,
        }
    }

    /// List users ordered by id, with skills resolved
    pub async fn list_users(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<UserProfile>, AppError> {
        let users = self.users.list(limit, offset).await?;

        let mut profiles = Vec::with_capacity(users.len());
        for user in users {
            let skills = self.references.find_skills(&user.skills).await?;
            profiles.push(UserProfile { user, skills });
        }
        Ok(profiles)
    }

    /// Get a user with skills resolved
    pub async fn get_profile(&self, id: &UserId) -> Result<Option<UserProfile>, AppError> {
        let Some(user) = self.users.find_by_id(id).await? else {
            return Ok(None);
        };
        let skills = self.users.skills(id).await?;
        Ok(Some(UserProfile { user, skills }))
    }

    /// Register a new candidate
    ///
    /// Counters start at zero and both company lists start empty.
    pub async fn register(&self, input: UserInput) -> Result<UserProfile, AppError> {
        input.validate()?;

        let id = UserId(input.id);
        if self.users.find_by_id(&id).await?.is_some() {
            return Err(DomainError::AlreadyExists(format!("User {} already exists", id)).into());
        }
        self.ensure_email_free(&input.email, None).await?;

        let skills = self.references.resolve_skills(&input.skills).await?;
        let user = User {
            id,
            full_name: input.full_name.trim().to_string(),
            roll_no: input.roll_no.trim().to_string(),
            email: input.email.trim().to_string(),
            branch: normalize_name(&input.branch),
            cgpa: input.cgpa,
            phone_no: input.phone_no,
            graduation_level: input.graduation_level,
            year: input.year,
            skills: skills.iter().map(|s| s.id).collect(),
            resume: input.resume,
            total_applications: 0,
            interviews: 0,
            upcoming: Vec::new(),
            applied_companies: Vec::new(),
        };

        let user = self.users.insert(&user).await?;
        tracing::info!(user_id = %user.id, roll_no = %user.roll_no, "Registered user");

        Ok(UserProfile { user, skills })
    }

    /// Replace a candidate's own fields
    ///
    /// Counters and company relationships are kept as stored; the repository
    /// never writes them from this snapshot.
    pub async fn update_profile(
        &self,
        id: &UserId,
        input: UserInput,
    ) -> Result<UserProfile, AppError> {
        if input.id != id.0 {
            return Err(DomainError::Validation(format!(
                "Body id {} does not match user {}",
                input.id, id
            ))
            .into());
        }
        input.validate()?;

        let existing = self.require_user(id).await?;
        self.ensure_email_free(&input.email, Some(id)).await?;

        let skills = self.references.resolve_skills(&input.skills).await?;
        let user = User {
            full_name: input.full_name.trim().to_string(),
            roll_no: input.roll_no.trim().to_string(),
            email: input.email.trim().to_string(),
            branch: normalize_name(&input.branch),
            cgpa: input.cgpa,
            phone_no: input.phone_no,
            graduation_level: input.graduation_level,
            year: input.year,
            skills: skills.iter().map(|s| s.id).collect(),
            resume: input.resume,
            ..existing
        };

        let user = self.users.update(&user).await?;
        tracing::info!(user_id = %user.id, "Updated user profile");

        Ok(UserProfile { user, skills })
    }

    /// Replace the skill list, creating unknown skills by name
    pub async fn update_skills(
        &self,
        id: &UserId,
        names: &[String],
    ) -> Result<UserProfile, AppError> {
        let mut user = self.require_user(id).await?;

        let skills = self.references.resolve_skills(names).await?;
        user.skills = skills.iter().map(|s| s.id).collect();

        let user = self.users.update(&user).await?;
        tracing::debug!(user_id = %user.id, skills = skills.len(), "Replaced skills");

        Ok(UserProfile { user, skills })
    }

    pub async fn remove_user(&self, id: &UserId) -> Result<(), AppError> {
        self.users.delete(id).await?;
        tracing::info!(user_id = %id, "Removed user");
        Ok(())
    }

    /// Companies on the user's upcoming list, in stored order
    pub async fn upcoming(&self, id: &UserId) -> Result<Vec<Company>, AppError> {
        self.require_user(id).await?;
        Ok(self.users.upcoming(id).await?)
    }

    /// Companies the user has applied to, in application order
    pub async fn applied_companies(&self, id: &UserId) -> Result<Vec<Company>, AppError> {
        self.require_user(id).await?;
        Ok(self.users.applied_companies(id).await?)
    }

    /// Apply to a company on the candidate's behalf
    ///
    /// Eligibility is not enforced here; it only shapes the upcoming list.
    pub async fn apply(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        today: NaiveDate,
    ) -> Result<User, AppError> {
        let user = self.require_user(user_id).await?;

        let company = self
            .companies
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Company {} not found", company_id)))?;

        if !company.accepts_applications_on(today) {
            return Err(DomainError::Validation(format!(
                "Applications to {} closed on {}",
                company.name, company.last_date_to_apply
            ))
            .into());
        }

        if user.has_applied_to(company_id) {
            return Err(DomainError::Conflict(format!(
                "User {} has already applied to company {}",
                user_id, company_id
            ))
            .into());
        }

        Ok(self.users.record_application(user_id, company_id).await?)
    }

    /// Recompute the upcoming list from every company on record
    ///
    /// A company is upcoming when the user is eligible for it, it still
    /// accepts applications on `today`, and the user has not applied yet.
    /// The result is ordered by deadline, then id.
    pub async fn refresh_upcoming(
        &self,
        user_id: &UserId,
        today: NaiveDate,
    ) -> Result<Vec<Company>, AppError> {
        let user = self.require_user(user_id).await?;

        let mut upcoming = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.companies.list(SCAN_PAGE, offset).await?;
            let fetched = page.len() as u64;

            let open: Vec<Company> = page
                .into_iter()
                .filter(|c| c.accepts_applications_on(today) && !user.has_applied_to(&c.id))
                .collect();
            upcoming.extend(
                load_details(self.references.as_ref(), open)
                    .await?
                    .into_iter()
                    .filter(|details| details.is_eligible(&user.branch, user.cgpa))
                    .map(|details| details.company),
            );

            if fetched < SCAN_PAGE {
                break;
            }
            offset += SCAN_PAGE;
        }

        upcoming.sort_by(|a, b| {
            a.last_date_to_apply
                .cmp(&b.last_date_to_apply)
                .then(a.id.cmp(&b.id))
        });

        let ids: Vec<CompanyId> = upcoming.iter().map(|c| c.id).collect();
        // An application recorded since the snapshot was taken is skipped here
        let stored = self.users.replace_upcoming(user_id, &ids).await?;
        upcoming.retain(|c| stored.contains(&c.id));

        tracing::debug!(
            user_id = %user_id,
            upcoming = stored.len(),
            "Refreshed upcoming companies"
        );
        Ok(upcoming)
    }

    async fn require_user(&self, id: &UserId) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", id)).into())
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<&UserId>) -> Result<(), AppError> {
        match self.users.find_by_email(email.trim()).await? {
            Some(other) if Some(&other.id) != owner => Err(DomainError::Conflict(format!(
                "Email {} is already registered",
                email.trim()
            ))
            .into()),
            _ => Ok(()),
        }
    }
}
