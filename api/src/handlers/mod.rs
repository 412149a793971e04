//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod companies;
mod extract;
pub mod health;
pub mod users;

pub use companies::{create_company, delete_company, get_company, list_companies, update_company};
pub use health::health;
pub use users::{
    apply, delete_user, get_applications, get_upcoming, get_user, list_users, refresh_upcoming,
    register_user, update_skills, update_user,
};

use serde::Deserialize;

/// Largest page a list endpoint returns
pub const MAX_PAGE_SIZE: u64 = 100;

/// Query parameters for paginated listings
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    20
}

impl ListQuery {
    /// Limit clamped to `1..=MAX_PAGE_SIZE`
    pub fn page_size(&self) -> u64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}
