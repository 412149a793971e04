#![allow(unused_imports)]

pub use super::branches::Entity as Branches;
pub use super::companies::Entity as Companies;
pub use super::company_eligible_branches::Entity as CompanyEligibleBranches;
pub use super::company_locations::Entity as CompanyLocations;
pub use super::locations::Entity as Locations;
pub use super::skills::Entity as Skills;
pub use super::user_applied_companies::Entity as UserAppliedCompanies;
pub use super::user_skills::Entity as UserSkills;
pub use super::user_upcoming_companies::Entity as UserUpcomingCompanies;
pub use super::users::Entity as Users;
