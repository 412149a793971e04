//! Company handlers
//!
//! Public listing and lookup, plus admin-only writes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;

use super::extract::{ApiJson, ApiPath};
use super::ListQuery;
use crate::app::CompanyInput;
use crate::domain::entities::{Company, CompanyDetails, CompanyId};
use crate::error::AppError;
use crate::AppState;

/// A company with its branches and locations rendered by name
#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub id: i32,
    pub name: String,
    pub stipend: Option<i32>,
    pub ctc: Option<i32>,
    pub link_to_apply: String,
    pub cgpa_cutoff: f64,
    pub eligible_branches: Vec<String>,
    pub locations: Vec<String>,
    pub last_date_to_apply: NaiveDate,
}

impl From<CompanyDetails> for CompanyResponse {
    fn from(details: CompanyDetails) -> Self {
        let CompanyDetails {
            company,
            eligible_branches,
            locations,
        } = details;
        Self {
            id: company.id.0,
            name: company.name,
            stipend: company.stipend,
            ctc: company.ctc,
            link_to_apply: company.link_to_apply,
            cgpa_cutoff: company.cgpa_cutoff,
            eligible_branches: eligible_branches.into_iter().map(|b| b.name).collect(),
            locations: locations.into_iter().map(|l| l.name).collect(),
            last_date_to_apply: company.last_date_to_apply,
        }
    }
}

/// A company without its relationships, as listed on a user
#[derive(Debug, Serialize)]
pub struct CompanySummary {
    pub id: i32,
    pub name: String,
    pub stipend: Option<i32>,
    pub ctc: Option<i32>,
    pub link_to_apply: String,
    pub cgpa_cutoff: f64,
    pub last_date_to_apply: NaiveDate,
}

impl From<Company> for CompanySummary {
    fn from(company: Company) -> Self {
        Self {
            id: company.id.0,
            name: company.name,
            stipend: company.stipend,
            ctc: company.ctc,
            link_to_apply: company.link_to_apply,
            cgpa_cutoff: company.cgpa_cutoff,
            last_date_to_apply: company.last_date_to_apply,
        }
    }
}

/// GET /companies
pub async fn list_companies(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CompanyResponse>>, AppError> {
    let companies = state
        .company_service
        .list_companies(query.page_size(), query.offset)
        .await?;

    Ok(Json(companies.into_iter().map(Into::into).collect()))
}

/// GET /companies/:id
pub async fn get_company(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<CompanyResponse>, AppError> {
    let details = state
        .company_service
        .get_company(&CompanyId(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Company {} not found", id)))?;

    Ok(Json(details.into()))
}

/// POST /companies
pub async fn create_company(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CompanyInput>,
) -> Result<(StatusCode, Json<CompanyResponse>), AppError> {
    let details = state.company_service.add_company(req).await?;
    Ok((StatusCode::CREATED, Json(details.into())))
}

/// PUT /companies/:id
pub async fn update_company(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(req): ApiJson<CompanyInput>,
) -> Result<Json<CompanyResponse>, AppError> {
    let details = state
        .company_service
        .update_company(&CompanyId(id), req)
        .await?;
    Ok(Json(details.into()))
}

/// DELETE /companies/:id
pub async fn delete_company(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, AppError> {
    state.company_service.remove_company(&CompanyId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
