//! User handlers
//!
//! Candidate profiles and the application flow.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::companies::CompanySummary;
use super::extract::{ApiJson, ApiPath};
use super::ListQuery;
use crate::app::UserInput;
use crate::domain::entities::{Company, CompanyId, User, UserId, UserProfile};
use crate::error::AppError;
use crate::AppState;

/// A user with skills rendered by name and companies by id
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub full_name: String,
    pub roll_no: String,
    pub email: String,
    pub branch: String,
    pub cgpa: f64,
    pub phone_no: String,
    pub graduation_level: String,
    pub year: i32,
    pub skills: Vec<String>,
    pub resume: Option<serde_json::Value>,
    pub total_applications: i32,
    pub interviews: i32,
    pub upcoming: Vec<i32>,
    pub applied_companies: Vec<i32>,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        let UserProfile { user, skills } = profile;
        Self {
            id: user.id.0,
            full_name: user.full_name,
            roll_no: user.roll_no,
            email: user.email,
            branch: user.branch,
            cgpa: user.cgpa,
            phone_no: user.phone_no,
            graduation_level: user.graduation_level,
            year: user.year,
            skills: skills.into_iter().map(|s| s.name).collect(),
            resume: user.resume,
            total_applications: user.total_applications,
            interviews: user.interviews,
            upcoming: user.upcoming.iter().map(|c| c.0).collect(),
            applied_companies: user.applied_companies.iter().map(|c| c.0).collect(),
        }
    }
}

/// Request to replace a user's skills
#[derive(Debug, Deserialize)]
pub struct UpdateSkillsRequest {
    pub skills: Vec<String>,
}

/// Request to apply to a company
#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub company_id: i32,
}

/// Response after recording an application
#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub user_id: i32,
    pub company_id: i32,
    pub total_applications: i32,
    pub applied_companies: Vec<i32>,
}

fn summaries(companies: Vec<Company>) -> Json<Vec<CompanySummary>> {
    Json(companies.into_iter().map(Into::into).collect())
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let profiles = state
        .user_service
        .list_users(query.page_size(), query.offset)
        .await?;
    Ok(Json(profiles.into_iter().map(Into::into).collect()))
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let profile = state
        .user_service
        .get_profile(&UserId(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    Ok(Json(profile.into()))
}

/// POST /users
pub async fn register_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserInput>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let profile = state.user_service.register(req).await?;
    Ok((StatusCode::CREATED, Json(profile.into())))
}

/// PUT /users/:id
pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(req): ApiJson<UserInput>,
) -> Result<Json<UserResponse>, AppError> {
    let profile = state.user_service.update_profile(&UserId(id), req).await?;
    Ok(Json(profile.into()))
}

/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, AppError> {
    state.user_service.remove_user(&UserId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /users/:id/skills
pub async fn update_skills(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(req): ApiJson<UpdateSkillsRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let profile = state
        .user_service
        .update_skills(&UserId(id), &req.skills)
        .await?;
    Ok(Json(profile.into()))
}

/// GET /users/:id/upcoming
pub async fn get_upcoming(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Vec<CompanySummary>>, AppError> {
    let companies = state.user_service.upcoming(&UserId(id)).await?;
    Ok(summaries(companies))
}

/// POST /users/:id/upcoming/refresh
pub async fn refresh_upcoming(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Vec<CompanySummary>>, AppError> {
    let today = Utc::now().date_naive();
    let companies = state
        .user_service
        .refresh_upcoming(&UserId(id), today)
        .await?;
    Ok(summaries(companies))
}

/// GET /users/:id/applications
pub async fn get_applications(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Vec<CompanySummary>>, AppError> {
    let companies = state.user_service.applied_companies(&UserId(id)).await?;
    Ok(summaries(companies))
}

/// POST /users/:id/applications
pub async fn apply(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(req): ApiJson<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplyResponse>), AppError> {
    let today = Utc::now().date_naive();
    let company_id = CompanyId(req.company_id);
    let user: User = state
        .user_service
        .apply(&UserId(id), &company_id, today)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApplyResponse {
            user_id: user.id.0,
            company_id: company_id.0,
            total_applications: user.total_applications,
            applied_companies: user.applied_companies.iter().map(|c| c.0).collect(),
        }),
    ))
}
