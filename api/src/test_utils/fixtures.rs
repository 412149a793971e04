//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::NaiveDate;
use serde_json::json;

use crate::app::{CompanyInput, UserInput};
use crate::domain::entities::{Branch, BranchId, Company, CompanyId, User, UserId};

/// A fixed "today" for deadline-sensitive tests
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

/// Create a test company that is open well past `test_today()`
pub fn test_company(id: i32) -> Company {
    Company {
        id: CompanyId(id),
        name: format!("Company {}", id),
        stipend: Some(25_000),
        ctc: Some(1_000_000),
        link_to_apply: format!("https://careers.example/{}", id),
        cgpa_cutoff: 6.5,
        eligible_branches: Vec::new(),
        locations: Vec::new(),
        last_date_to_apply: NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
    }
}

/// Create a test company open to the given branches, with a deadline and cutoff
pub fn test_company_for(
    id: i32,
    branches: &[BranchId],
    cgpa_cutoff: f64,
    last_date_to_apply: NaiveDate,
) -> Company {
    Company {
        eligible_branches: branches.to_vec(),
        cgpa_cutoff,
        last_date_to_apply,
        ..test_company(id)
    }
}

/// Create a test user with default values
pub fn test_user(id: i32) -> User {
    User {
        id: UserId(id),
        full_name: format!("Candidate {}", id),
        roll_no: format!("21CS{:03}", id),
        email: format!("candidate{}@college.example", id),
        branch: "CSE".to_string(),
        cgpa: 8.0,
        phone_no: "9876543210".to_string(),
        graduation_level: "UG".to_string(),
        year: 2026,
        skills: Vec::new(),
        resume: None,
        total_applications: 0,
        interviews: 0,
        upcoming: Vec::new(),
        applied_companies: Vec::new(),
    }
}

pub fn test_branch(id: i32, name: &str) -> Branch {
    Branch {
        id: BranchId(id),
        name: name.to_string(),
    }
}

/// A valid company request body
pub fn test_company_input(id: i32) -> CompanyInput {
    CompanyInput {
        id,
        name: format!("Company {}", id),
        stipend: Some(30_000),
        ctc: None,
        link_to_apply: "https://careers.example/apply".to_string(),
        cgpa_cutoff: 7.0,
        eligible_branches: vec!["CSE".to_string(), "ECE".to_string()],
        locations: vec!["Bengaluru".to_string()],
        last_date_to_apply: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
    }
}

/// A valid user request body
pub fn test_user_input(id: i32) -> UserInput {
    UserInput {
        id,
        full_name: format!("Candidate {}", id),
        roll_no: format!("21CS{:03}", id),
        email: format!("candidate{}@college.example", id),
        branch: "CSE".to_string(),
        cgpa: 8.4,
        phone_no: "9876543210".to_string(),
        graduation_level: "UG".to_string(),
        year: 2026,
        skills: vec!["Rust".to_string(), "SQL".to_string()],
        resume: Some(json!({ "file_name": "resume.pdf" })),
    }
}
