//! User domain entity
//!
//! Represents a placement candidate.

use serde::{Deserialize, Serialize};

use super::company::CompanyId;
use super::reference::{Skill, SkillId};

/// Unique identifier for a user (externally assigned)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i32);

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A placement candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub roll_no: String,
    pub email: String,
    pub branch: String,
    pub cgpa: f64,
    pub phone_no: String,
    pub graduation_level: String,
    pub year: i32,
    pub skills: Vec<SkillId>,
    /// Resume attachment. Its representation is not settled, so it is kept
    /// as an opaque value and round-tripped verbatim.
    pub resume: Option<serde_json::Value>,
    pub total_applications: i32,
    pub interviews: i32,
    pub upcoming: Vec<CompanyId>,
    pub applied_companies: Vec<CompanyId>,
}

impl User {
    /// Check if this user has already applied to a company
    pub fn has_applied_to(&self, company_id: &CompanyId) -> bool {
        self.applied_companies.contains(company_id)
    }
}

/// A user with the skill relationship navigated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub user: User,
    pub skills: Vec<Skill>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_user() -> User {
        User {
            id: UserId(101),
            full_name: "Asha Rao".to_string(),
            roll_no: "21CS042".to_string(),
            email: "asha@college.example".to_string(),
            branch: "CSE".to_string(),
            cgpa: 8.7,
            phone_no: "+91-9000000000".to_string(),
            graduation_level: "UG".to_string(),
            year: 2026,
            skills: vec![SkillId(1), SkillId(5)],
            resume: Some(json!({ "url": "https://files.example/r.pdf" })),
            total_applications: 2,
            interviews: 1,
            upcoming: vec![CompanyId(3)],
            applied_companies: vec![CompanyId(1), CompanyId(2)],
        }
    }

    #[test]
    fn has_applied_to() {
        let user = make_user();
        assert!(user.has_applied_to(&CompanyId(1)));
        assert!(!user.has_applied_to(&CompanyId(3)));
    }

    #[test]
    fn user_serde_round_trip() {
        let user = make_user();
        let json = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn empty_collections_round_trip() {
        let mut user = make_user();
        user.skills.clear();
        user.upcoming.clear();
        user.applied_companies.clear();
        user.resume = None;

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["skills"], json!([]));
        assert_eq!(json["resume"], serde_json::Value::Null);

        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn user_id_display() {
        assert_eq!(UserId(9).to_string(), "9");
    }
}
