//! PostgreSQL adapter for UserRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, NotSet, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};

use super::company_repo::hydrate_companies;
use super::join_position;
use crate::domain::entities::{Company, CompanyId, Skill, SkillId, User, UserId};
use crate::domain::ports::UserRepository;
use crate::entity::{
    companies, skills, user_applied_companies, user_skills, user_upcoming_companies, users,
};
use crate::error::DomainError;

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        match result {
            Some(model) => Ok(hydrate_users(&self.db, vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        match result {
            Some(model) => Ok(hydrate_users(&self.db, vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<User>, DomainError> {
        let results = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        hydrate_users(&self.db, results).await
    }

    async fn insert(&self, user: &User) -> Result<User, DomainError> {
        let txn = self.db.begin().await?;

        if users::Entity::find_by_id(user.id.0).one(&txn).await?.is_some() {
            return Err(DomainError::AlreadyExists(format!(
                "User {} already exists",
                user.id
            )));
        }

        to_active_model(user)
            .insert(&txn)
            .await
            .map_err(|e| write_error(e, user.id))?;
        write_relations(&txn, user).await?;

        txn.commit().await?;

        tracing::debug!(user_id = %user.id, "Inserted user");
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let txn = self.db.begin().await?;

        // Same row lock as record_application, so the two never interleave
        if users::Entity::find_by_id(user.id.0)
            .lock_exclusive()
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(DomainError::NotFound(format!("User {} not found", user.id)));
        }

        let mut active_model = to_active_model(user);
        active_model.total_applications = NotSet;
        active_model.interviews = NotSet;
        let model = active_model
            .update(&txn)
            .await
            .map_err(|e| write_error(e, user.id))?;
        replace_skill_rows(&txn, &user.id, &user.skills).await?;

        let stored = hydrate_users(&txn, vec![model])
            .await?
            .pop()
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", user.id)))?;

        txn.commit().await?;

        Ok(stored)
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        let result = users::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            Err(DomainError::NotFound(format!("User {} not found", id)))
        } else {
            Ok(())
        }
    }

    async fn skills(&self, id: &UserId) -> Result<Vec<Skill>, DomainError> {
        let rows = user_skills::Entity::find()
            .filter(user_skills::Column::UserId.eq(id.0))
            .find_also_related(skills::Entity)
            .order_by_asc(user_skills::Column::Position)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|(_, skill)| skill.map(Skill::from))
            .collect())
    }

    async fn upcoming(&self, id: &UserId) -> Result<Vec<Company>, DomainError> {
        let rows = user_upcoming_companies::Entity::find()
            .filter(user_upcoming_companies::Column::UserId.eq(id.0))
            .find_also_related(companies::Entity)
            .order_by_asc(user_upcoming_companies::Column::Position)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let models = rows.into_iter().filter_map(|(_, company)| company).collect();
        hydrate_companies(&self.db, models).await
    }

    async fn applied_companies(&self, id: &UserId) -> Result<Vec<Company>, DomainError> {
        let rows = user_applied_companies::Entity::find()
            .filter(user_applied_companies::Column::UserId.eq(id.0))
            .find_also_related(companies::Entity)
            .order_by_asc(user_applied_companies::Column::Position)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let models = rows.into_iter().filter_map(|(_, company)| company).collect();
        hydrate_companies(&self.db, models).await
    }

    async fn record_application(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
    ) -> Result<User, DomainError> {
        let txn = self.db.begin().await?;

        // Row lock serializes concurrent applications by the same user
        let user = users::Entity::find_by_id(user_id.0)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", user_id)))?;

        let applied = user_applied_companies::Entity::find()
            .filter(user_applied_companies::Column::UserId.eq(user_id.0))
            .all(&txn)
            .await?;

        if applied.iter().any(|row| row.company_id == company_id.0) {
            return Err(DomainError::Conflict(format!(
                "User {} has already applied to company {}",
                user_id, company_id
            )));
        }

        let next_position = applied.iter().map(|row| row.position + 1).max().unwrap_or(0);

        user_applied_companies::ActiveModel {
            user_id: Set(user_id.0),
            position: Set(next_position),
            company_id: Set(company_id.0),
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                DomainError::NotFound(format!("Company {} not found", company_id))
            }
            _ => DomainError::Database(e.to_string()),
        })?;

        user_upcoming_companies::Entity::delete_many()
            .filter(user_upcoming_companies::Column::UserId.eq(user_id.0))
            .filter(user_upcoming_companies::Column::CompanyId.eq(company_id.0))
            .exec(&txn)
            .await?;

        let total_applications = user.total_applications + 1;
        let mut active_model = user.into_active_model();
        active_model.total_applications = Set(total_applications);
        active_model.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            user_id = %user_id,
            company_id = %company_id,
            total_applications,
            "Recorded application"
        );

        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", user_id)))
    }

    async fn replace_upcoming(
        &self,
        user_id: &UserId,
        companies: &[CompanyId],
    ) -> Result<Vec<CompanyId>, DomainError> {
        let txn = self.db.begin().await?;

        users::Entity::find_by_id(user_id.0)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", user_id)))?;

        let applied: Vec<i32> = user_applied_companies::Entity::find()
            .filter(user_applied_companies::Column::UserId.eq(user_id.0))
            .all(&txn)
            .await?
            .into_iter()
            .map(|row| row.company_id)
            .collect();

        let upcoming: Vec<CompanyId> = companies
            .iter()
            .filter(|id| !applied.contains(&id.0))
            .copied()
            .collect();
        replace_upcoming_rows(&txn, user_id, &upcoming).await?;

        txn.commit().await?;
        Ok(upcoming)
    }
}

/// Attach relationship ids to a batch of user rows
async fn hydrate_users<C: ConnectionTrait>(
    conn: &C,
    models: Vec<users::Model>,
) -> Result<Vec<User>, DomainError> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

    let skill_rows = user_skills::Entity::find()
        .filter(user_skills::Column::UserId.is_in(ids.clone()))
        .order_by_asc(user_skills::Column::UserId)
        .order_by_asc(user_skills::Column::Position)
        .all(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    let upcoming_rows = user_upcoming_companies::Entity::find()
        .filter(user_upcoming_companies::Column::UserId.is_in(ids.clone()))
        .order_by_asc(user_upcoming_companies::Column::UserId)
        .order_by_asc(user_upcoming_companies::Column::Position)
        .all(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    let applied_rows = user_applied_companies::Entity::find()
        .filter(user_applied_companies::Column::UserId.is_in(ids))
        .order_by_asc(user_applied_companies::Column::UserId)
        .order_by_asc(user_applied_companies::Column::Position)
        .all(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    let mut skills_by_user: HashMap<i32, Vec<SkillId>> = HashMap::new();
    for row in skill_rows {
        skills_by_user
            .entry(row.user_id)
            .or_default()
            .push(SkillId(row.skill_id));
    }

    let mut upcoming_by_user: HashMap<i32, Vec<CompanyId>> = HashMap::new();
    for row in upcoming_rows {
        upcoming_by_user
            .entry(row.user_id)
            .or_default()
            .push(CompanyId(row.company_id));
    }

    let mut applied_by_user: HashMap<i32, Vec<CompanyId>> = HashMap::new();
    for row in applied_rows {
        applied_by_user
            .entry(row.user_id)
            .or_default()
            .push(CompanyId(row.company_id));
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let skills = skills_by_user.remove(&model.id).unwrap_or_default();
            let upcoming = upcoming_by_user.remove(&model.id).unwrap_or_default();
            let applied = applied_by_user.remove(&model.id).unwrap_or_default();
            into_user(model, skills, upcoming, applied)
        })
        .collect())
}

/// Write the join rows for all three of a new user's relationships
async fn write_relations<C: ConnectionTrait>(conn: &C, user: &User) -> Result<(), DomainError> {
    replace_skill_rows(conn, &user.id, &user.skills).await?;
    replace_upcoming_rows(conn, &user.id, &user.upcoming).await?;
    replace_applied_rows(conn, &user.id, &user.applied_companies).await?;
    Ok(())
}

async fn replace_skill_rows<C: ConnectionTrait>(
    conn: &C,
    user_id: &UserId,
    skills: &[SkillId],
) -> Result<(), DomainError> {
    user_skills::Entity::delete_many()
        .filter(user_skills::Column::UserId.eq(user_id.0))
        .exec(conn)
        .await
        .map_err(|e| write_error(e, *user_id))?;

    if !skills.is_empty() {
        let rows = skills
            .iter()
            .enumerate()
            .map(|(index, skill)| {
                Ok(user_skills::ActiveModel {
                    user_id: Set(user_id.0),
                    position: Set(join_position(index)?),
                    skill_id: Set(skill.0),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        user_skills::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(|e| write_error(e, *user_id))?;
    }

    Ok(())
}

async fn replace_upcoming_rows<C: ConnectionTrait>(
    conn: &C,
    user_id: &UserId,
    companies: &[CompanyId],
) -> Result<(), DomainError> {
    user_upcoming_companies::Entity::delete_many()
        .filter(user_upcoming_companies::Column::UserId.eq(user_id.0))
        .exec(conn)
        .await
        .map_err(|e| write_error(e, *user_id))?;

    if !companies.is_empty() {
        let rows = companies
            .iter()
            .enumerate()
            .map(|(index, company)| {
                Ok(user_upcoming_companies::ActiveModel {
                    user_id: Set(user_id.0),
                    position: Set(join_position(index)?),
                    company_id: Set(company.0),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        user_upcoming_companies::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(|e| write_error(e, *user_id))?;
    }

    Ok(())
}

async fn replace_applied_rows<C: ConnectionTrait>(
    conn: &C,
    user_id: &UserId,
    companies: &[CompanyId],
) -> Result<(), DomainError> {
    user_applied_companies::Entity::delete_many()
        .filter(user_applied_companies::Column::UserId.eq(user_id.0))
        .exec(conn)
        .await
        .map_err(|e| write_error(e, *user_id))?;

    if !companies.is_empty() {
        let rows = companies
            .iter()
            .enumerate()
            .map(|(index, company)| {
                Ok(user_applied_companies::ActiveModel {
                    user_id: Set(user_id.0),
                    position: Set(join_position(index)?),
                    company_id: Set(company.0),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        user_applied_companies::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(|e| write_error(e, *user_id))?;
    }

    Ok(())
}

fn write_error(e: DbErr, id: UserId) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::Conflict(format!("User {} conflicts with an existing user", id))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => DomainError::Validation(format!(
            "User {} references an unknown skill or company: {}",
            id, msg
        )),
        _ => DomainError::Database(e.to_string()),
    }
}

fn to_active_model(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(user.id.0),
        full_name: Set(user.full_name.clone()),
        roll_no: Set(user.roll_no.clone()),
        email: Set(user.email.clone()),
        branch: Set(user.branch.clone()),
        cgpa: Set(user.cgpa),
        phone_no: Set(user.phone_no.clone()),
        graduation_level: Set(user.graduation_level.clone()),
        year: Set(user.year),
        resume: Set(user.resume.clone()),
        total_applications: Set(user.total_applications),
        interviews: Set(user.interviews),
    }
}

/// Convert SeaORM model plus relationship ids to domain entity
fn into_user(
    model: users::Model,
    skills: Vec<SkillId>,
    upcoming: Vec<CompanyId>,
    applied_companies: Vec<CompanyId>,
) -> User {
    User {
        id: UserId(model.id),
        full_name: model.full_name,
        roll_no: model.roll_no,
        email: model.email,
        branch: model.branch,
        cgpa: model.cgpa,
        phone_no: model.phone_no,
        graduation_level: model.graduation_level,
        year: model.year,
        skills,
        resume: model.resume,
        total_applications: model.total_applications,
        interviews: model.interviews,
        upcoming,
        applied_companies,
    }
}
