//! Reference entities
//!
//! Branches, locations and skills are named lookup rows that companies and
//! users point at. They are created on demand by name.

use serde::{Deserialize, Serialize};

/// Unique identifier for an academic branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchId(pub i32);

impl From<i32> for BranchId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BranchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a recruiting location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationId(pub i32);

impl From<i32> for LocationId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillId(pub i32);

impl From<i32> for SkillId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SkillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An academic branch a company may recruit from (e.g. "CSE")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
}

/// A location a company recruits for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
}

/// A skill listed on a user's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
}

/// Normalize a reference name for storage and comparison.
///
/// Trims surrounding whitespace and collapses inner runs of whitespace.
/// Case is preserved; comparisons use `eq_ignore_ascii_case`.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive lookup key for a reference name
pub fn name_key(name: &str) -> String {
    normalize_name(name).to_lowercase()
}
