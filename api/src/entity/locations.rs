use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "locations")]
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
    #[sea_orm(has_many = "super::company_locations::Entity")]
    CompanyLocations,
}

impl Related<super::company_locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyLocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
