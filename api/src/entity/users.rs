use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub full_name: String,
    pub roll_no: String,
    #[sea_orm(unique)]
    pub email: String,
    pub branch: String,
    #[sea_orm(column_type = "Double")]
    pub cgpa: f64,
    pub phone_no: String,
    pub graduation_level: String,
    pub year: i32,
    /// Opaque attachment, stored verbatim
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub resume: Option<Json>,
    pub total_applications: i32,
    pub interviews: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_skills::Entity")]
    UserSkills,
    #[sea_orm(has_many = "super::user_upcoming_companies::Entity")]
    UserUpcomingCompanies,
    #[sea_orm(has_many = "super::user_applied_companies::Entity")]
    UserAppliedCompanies,
}

impl Related<super::user_skills::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserSkills.def()
    }
}

impl Related<super::user_upcoming_companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserUpcomingCompanies.def()
    }
}

impl Related<super::user_applied_companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAppliedCompanies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
