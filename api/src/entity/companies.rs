use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    pub stipend: Option<i32>,
    pub ctc: Option<i32>,
    pub link_to_apply: String,
    #[sea_orm(column_type = "Double")]
    pub cgpa_cutoff: f64,
    pub last_date_to_apply: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::company_eligible_branches::Entity")]
    CompanyEligibleBranches,
    #[sea_orm(has_many = "super::company_locations::Entity")]
    CompanyLocations,
    #[sea_orm(has_many = "super::user_applied_companies::Entity")]
    UserAppliedCompanies,
    #[sea_orm(has_many = "super::user_upcoming_companies::Entity")]
    UserUpcomingCompanies,
}

impl Related<super::company_eligible_branches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyEligibleBranches.def()
    }
}

impl Related<super::company_locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyLocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
