use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "branches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Lowercased name; uniqueness is case-insensitive
    #[sea_orm(unique)]
    pub name_key: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::company_eligible_branches::Entity")]
    CompanyEligibleBranches,
}

impl Related<super::company_eligible_branches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyEligibleBranches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
