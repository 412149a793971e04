//! Company service
//!
//! Validates company writes, resolves branch and location names, and
//! assembles companies with their relationships navigated.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;

use crate::domain::entities::{
    Branch, BranchId, Company, CompanyDetails, CompanyId, Location, LocationId,
};
use crate::domain::ports::{CompanyRepository, ReferenceRepository};
use crate::error::{AppError, DomainError};

/// Highest CGPA on the grading scale
pub const MAX_CGPA: f64 = 10.0;

/// Company fields as submitted by an administrator.
///
/// Branches and locations are given by name and created on demand.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyInput {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub stipend: Option<i32>,
    #[serde(default)]
    pub ctc: Option<i32>,
    pub link_to_apply: String,
    pub cgpa_cutoff: f64,
    #[serde(default)]
    pub eligible_branches: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    pub last_date_to_apply: NaiveDate,
}

impl CompanyInput {
    /// Check the field-level rules that do not need storage
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation(
                "Company name must not be empty".to_string(),
            ));
        }

        if self.stipend.is_none() && self.ctc.is_none() {
            return Err(DomainError::Validation(
                "Either stipend or ctc is required".to_string(),
            ));
        }

        if self.stipend.is_some_and(|v| v < 0) || self.ctc.is_some_and(|v| v < 0) {
            return Err(DomainError::Validation(
                "Compensation must not be negative".to_string(),
            ));
        }

        if !(0.0..=MAX_CGPA).contains(&self.cgpa_cutoff) {
            return Err(DomainError::Validation(format!(
                "cgpa_cutoff must be between 0 and {}",
                MAX_CGPA
            )));
        }

        if !is_http_url(&self.link_to_apply) {
            return Err(DomainError::Validation(
                "link_to_apply must be an http(s) URL".to_string(),
            ));
        }

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r"^https?://[^\s/?#]+[^\s]*$").unwrap())
        .is_match(value.trim())
}

/// Service for managing companies
pub struct CompanyService<CR, RR>
where
    CR: CompanyRepository + ?Sized,
    RR: ReferenceRepository + ?Sized,
{
    companies: Arc<CR>,
    references: Arc<RR>,
}

impl<CR, RR> CompanyService<CR, RR>
where
    CR: CompanyRepository + ?Sized,
    RR: ReferenceRepository + ?Sized,
{
    pub fn new(companies: Arc<CR>, references: Arc<RR>) -> Self {
        Self {
            companies,
            references,
        }
    }

    /// List companies ordered by id, with relationships resolved
    pub async fn list_companies(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<CompanyDetails>, AppError> {
        let companies = self.companies.list(limit, offset).await?;
        Ok(load_details(self.references.as_ref(), companies).await?)
    }

    /// Get a single company by id
    pub async fn get_company(&self, id: &CompanyId) -> Result<Option<CompanyDetails>, AppError> {
        let Some(company) = self.companies.find_by_id(id).await? else {
            return Ok(None);
        };

        let eligible_branches = self.companies.eligible_branches(id).await?;
        let locations = self.companies.locations(id).await?;

        Ok(Some(CompanyDetails {
            company,
            eligible_branches,
            locations,
        }))
    }

    /// Validate and persist a new company
    pub async fn add_company(&self, input: CompanyInput) -> Result<CompanyDetails, AppError> {
        input.validate()?;

        let (company, eligible_branches, locations) = self.build(input).await?;
        let company = self.companies.insert(&company).await?;

        tracing::info!(company_id = %company.id, name = %company.name, "Added company");

        Ok(CompanyDetails {
            company,
            eligible_branches,
            locations,
        })
    }

    /// Replace every field of an existing company
    pub async fn update_company(
        &self,
        id: &CompanyId,
        input: CompanyInput,
    ) -> Result<CompanyDetails, AppError> {
        if input.id != id.0 {
            return Err(DomainError::Validation(format!(
                "Body id {} does not match company {}",
                input.id, id
            ))
            .into());
        }
        input.validate()?;

        let (company, eligible_branches, locations) = self.build(input).await?;
        let company = self.companies.update(&company).await?;

        tracing::info!(company_id = %company.id, "Updated company");

        Ok(CompanyDetails {
            company,
            eligible_branches,
            locations,
        })
    }

    /// Delete a company. Users lose it from their upcoming and applied lists.
    pub async fn remove_company(&self, id: &CompanyId) -> Result<(), AppError> {
        self.companies.delete(id).await?;
        tracing::info!(company_id = %id, "Removed company");
        Ok(())
    }

    async fn build(
        &self,
        input: CompanyInput,
    ) -> Result<(Company, Vec<Branch>, Vec<Location>), AppError> {
        let eligible_branches = self
            .references
            .resolve_branches(&input.eligible_branches)
            .await?;
        let locations = self.references.resolve_locations(&input.locations).await?;

        let company = Company {
            id: CompanyId(input.id),
            name: input.name.trim().to_string(),
            stipend: input.stipend,
            ctc: input.ctc,
            link_to_apply: input.link_to_apply.trim().to_string(),
            cgpa_cutoff: input.cgpa_cutoff,
            eligible_branches: eligible_branches.iter().map(|b| b.id).collect(),
            locations: locations.iter().map(|l| l.id).collect(),
            last_date_to_apply: input.last_date_to_apply,
        };

        Ok((company, eligible_branches, locations))
    }
}

/// Resolve the relationships of a batch of companies with two lookups
pub(crate) async fn load_details<RR>(
    references: &RR,
    companies: Vec<Company>,
) -> Result<Vec<CompanyDetails>, DomainError>
where
    RR: ReferenceRepository + ?Sized,
{
    let mut branch_ids: Vec<BranchId> = companies
        .iter()
        .flat_map(|c| c.eligible_branches.iter().copied())
        .collect();
    branch_ids.sort_by_key(|id| id.0);
    branch_ids.dedup();

    let mut location_ids: Vec<LocationId> = companies
        .iter()
        .flat_map(|c| c.locations.iter().copied())
        .collect();
    location_ids.sort_by_key(|id| id.0);
    location_ids.dedup();

    let branches: HashMap<BranchId, Branch> = references
        .find_branches(&branch_ids)
        .await?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();
    let locations: HashMap<LocationId, Location> = references
        .find_locations(&location_ids)
        .await?
        .into_iter()
        .map(|l| (l.id, l))
        .collect();

    Ok(companies
        .into_iter()
        .map(|company| CompanyDetails {
            eligible_branches: company
                .eligible_branches
                .iter()
                .filter_map(|id| branches.get(id).cloned())
                .collect(),
            locations: company
                .locations
                .iter()
                .filter_map(|id| locations.get(id).cloned())
                .collect(),
            company,
        })
        .collect())
}
