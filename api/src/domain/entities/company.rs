//! Company domain entity
//!
//! Represents a recruiting company and the terms of its placement drive.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::reference::{normalize_name, Branch, BranchId, Location, LocationId};

/// Unique identifier for a company (externally assigned)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompanyId(pub i32);

impl From<i32> for CompanyId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recruiting company
///
/// Relationships are held as ordered id lists; the storage layer resolves
/// them through explicit join tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub stipend: Option<i32>,
    pub ctc: Option<i32>,
    pub link_to_apply: String,
    pub cgpa_cutoff: f64,
    pub eligible_branches: Vec<BranchId>,
    pub locations: Vec<LocationId>,
    pub last_date_to_apply: NaiveDate,
}

impl Company {
    /// Whether applications are still open on the given day.
    ///
    /// The last date to apply is inclusive.
    pub fn accepts_applications_on(&self, date: NaiveDate) -> bool {
        date <= self.last_date_to_apply
    }

    /// Whether a CGPA clears this company's cutoff
    pub fn meets_cutoff(&self, cgpa: f64) -> bool {
        cgpa >= self.cgpa_cutoff
    }
}

/// A company with its relationships navigated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetails {
    pub company: Company,
    pub eligible_branches: Vec<Branch>,
    pub locations: Vec<Location>,
}

impl CompanyDetails {
    /// Check whether a candidate from `branch` with `cgpa` may apply.
    ///
    /// Branch names match case-insensitively after whitespace normalization.
    pub fn is_eligible(&self, branch: &str, cgpa: f64) -> bool {
        let branch = normalize_name(branch);
        self.company.meets_cutoff(cgpa)
            && self
                .eligible_branches
                .iter()
                .any(|b| normalize_name(&b.name).eq_ignore_ascii_case(&branch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_company() -> Company {
        Company {
            id: CompanyId(7),
            name: "Acme Systems".to_string(),
            stipend: Some(40_000),
            ctc: Some(1_800_000),
            link_to_apply: "https://acme.example/careers".to_string(),
            cgpa_cutoff: 7.5,
            eligible_branches: vec![BranchId(1), BranchId(2)],
            locations: vec![LocationId(4)],
            last_date_to_apply: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        }
    }

    fn make_details() -> CompanyDetails {
        CompanyDetails {
            company: make_company(),
            eligible_branches: vec![
                Branch {
                    id: BranchId(1),
                    name: "CSE".to_string(),
                },
                Branch {
                    id: BranchId(2),
                    name: "ECE".to_string(),
                },
            ],
            locations: vec![Location {
                id: LocationId(4),
                name: "Bengaluru".to_string(),
            }],
        }
    }

    #[test]
    fn accepts_applications_until_deadline_inclusive() {
        let company = make_company();
        assert!(company.accepts_applications_on(NaiveDate::from_ymd_opt(2026, 3, 30).unwrap()));
        assert!(company.accepts_applications_on(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()));
        assert!(!company.accepts_applications_on(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()));
    }

    #[test]
    fn meets_cutoff_is_inclusive() {
        let company = make_company();
        assert!(company.meets_cutoff(7.5));
        assert!(company.meets_cutoff(9.1));
        assert!(!company.meets_cutoff(7.49));
    }

    #[test]
    fn eligibility_matches_branch_case_insensitively() {
        let details = make_details();
        assert!(details.is_eligible("cse", 8.0));
        assert!(details.is_eligible(" ECE ", 7.5));
    }

    #[test]
    fn eligibility_ignores_inner_whitespace_runs() {
        let mut details = make_details();
        details.eligible_branches.push(Branch {
            id: BranchId(3),
            name: "Computer Science".to_string(),
        });
        assert!(details.is_eligible("Computer  Science", 8.0));
        assert!(details.is_eligible("computer\tscience ", 8.0));
    }

    #[test]
    fn eligibility_requires_branch_and_cutoff() {
        let details = make_details();
        assert!(!details.is_eligible("MECH", 9.9));
        assert!(!details.is_eligible("CSE", 6.0));
    }

    #[test]
    fn no_eligible_branches_means_nobody_is_eligible() {
        let mut details = make_details();
        details.eligible_branches.clear();
        details.company.eligible_branches.clear();
        assert!(!details.is_eligible("CSE", 10.0));
    }

    #[test]
    fn company_serde_round_trip() {
        let company = make_company();
        let json = serde_json::to_string(&company).unwrap();
        let back: Company = serde_json::from_str(&json).unwrap();
        assert_eq!(back, company);
    }

    #[test]
    fn company_id_display() {
        assert_eq!(CompanyId(42).to_string(), "42");
    }
}
