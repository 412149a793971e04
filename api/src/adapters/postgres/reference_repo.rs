//! PostgreSQL adapter for ReferenceRepository
//!
//! Branch, location and skill rows are matched by their lowercased
//! `name_key` and created when missing. The unique index on `name_key`
//! makes two differently-cased creates of the same name collide.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, Set, SqlErr,
};

use crate::domain::entities::{
    name_key, normalize_name, Branch, BranchId, Location, LocationId, Skill, SkillId,
};
use crate::domain::ports::ReferenceRepository;
use crate::entity::{branches, locations, skills};
use crate::error::DomainError;

/// A reference table keyed by name
trait ReferenceTable: EntityTrait {
    /// Singular noun used in logs and errors
    const KIND: &'static str;

    fn id_column() -> Self::Column;

    fn name_key_column() -> Self::Column;

    fn id_of(model: &Self::Model) -> i32;

    /// A new row for an already normalized name
    fn new_row(name: &str) -> Self::ActiveModel;
}

impl ReferenceTable for branches::Entity {
    const KIND: &'static str = "branch";

    fn id_column() -> Self::Column {
        branches::Column::Id
    }

    fn name_key_column() -> Self::Column {
        branches::Column::NameKey
    }

    fn id_of(model: &branches::Model) -> i32 {
        model.id
    }

    fn new_row(name: &str) -> branches::ActiveModel {
        branches::ActiveModel {
            name: Set(name.to_string()),
            name_key: Set(name_key(name)),
            ..Default::default()
        }
    }
}

impl ReferenceTable for locations::Entity {
    const KIND: &'static str = "location";

    fn id_column() -> Self::Column {
        locations::Column::Id
    }

    fn name_key_column() -> Self::Column {
        locations::Column::NameKey
    }

    fn id_of(model: &locations::Model) -> i32 {
        model.id
    }

    fn new_row(name: &str) -> locations::ActiveModel {
        locations::ActiveModel {
            name: Set(name.to_string()),
            name_key: Set(name_key(name)),
            ..Default::default()
        }
    }
}

impl ReferenceTable for skills::Entity {
    const KIND: &'static str = "skill";

    fn id_column() -> Self::Column {
        skills::Column::Id
    }

    fn name_key_column() -> Self::Column {
        skills::Column::NameKey
    }

    fn id_of(model: &skills::Model) -> i32 {
        model.id
    }

    fn new_row(name: &str) -> skills::ActiveModel {
        skills::ActiveModel {
            name: Set(name.to_string()),
            name_key: Set(name_key(name)),
            ..Default::default()
        }
    }
}

/// PostgreSQL implementation of ReferenceRepository
pub struct PostgresReferenceRepository {
    db: DatabaseConnection,
}

impl PostgresReferenceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Find or create every non-blank name, preserving input order
    async fn resolve_all<E, T>(&self, names: &[String]) -> Result<Vec<T>, DomainError>
    where
        E: ReferenceTable,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: ActiveModelBehavior + Send,
        T: From<E::Model>,
    {
        let mut resolved = Vec::with_capacity(names.len());
        for name in names.iter().map(|n| normalize_name(n)) {
            if name.is_empty() {
                continue;
            }
            resolved.push(T::from(self.resolve_one::<E>(&name).await?));
        }
        Ok(resolved)
    }

    async fn resolve_one<E>(&self, name: &str) -> Result<E::Model, DomainError>
    where
        E: ReferenceTable,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: ActiveModelBehavior + Send,
    {
        let key = name_key(name);
        let lookup = || {
            E::find()
                .filter(E::name_key_column().eq(key.clone()))
                .one(&self.db)
        };

        if let Some(found) = lookup()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
        {
            return Ok(found);
        }

        match E::new_row(name).insert(&self.db).await {
            Ok(created) => {
                tracing::info!(kind = E::KIND, name, "Created reference row");
                Ok(created)
            }
            // Lost a race with a concurrent insert of the same key
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                lookup().await?.ok_or_else(|| {
                    DomainError::Internal(format!("{} '{}' vanished", E::KIND, name))
                })
            }
            Err(e) => Err(DomainError::Database(e.to_string())),
        }
    }

    /// Look up rows by id, preserving input order and skipping unknown ids
    async fn find_all<E, T>(&self, ids: &[i32]) -> Result<Vec<T>, DomainError>
    where
        E: ReferenceTable,
        E::Model: Clone,
        T: From<E::Model>,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found: HashMap<i32, E::Model> = E::find()
            .filter(E::id_column().is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .into_iter()
            .map(|m| (E::id_of(&m), m))
            .collect();

        Ok(ids
            .iter()
            .filter_map(|id| found.get(id).cloned().map(T::from))
            .collect())
    }
}

#[async_trait]
impl ReferenceRepository for PostgresReferenceRepository {
    async fn resolve_branches(&self, names: &[String]) -> Result<Vec<Branch>, DomainError> {
        self.resolve_all::<branches::Entity, _>(names).await
    }

    async fn resolve_locations(&self, names: &[String]) -> Result<Vec<Location>, DomainError> {
        self.resolve_all::<locations::Entity, _>(names).await
    }

    async fn resolve_skills(&self, names: &[String]) -> Result<Vec<Skill>, DomainError> {
        self.resolve_all::<skills::Entity, _>(names).await
    }

    async fn find_branches(&self, ids: &[BranchId]) -> Result<Vec<Branch>, DomainError> {
        let ids: Vec<i32> = ids.iter().map(|id| id.0).collect();
        self.find_all::<branches::Entity, _>(&ids).await
    }

    async fn find_locations(&self, ids: &[LocationId]) -> Result<Vec<Location>, DomainError> {
        let ids: Vec<i32> = ids.iter().map(|id| id.0).collect();
        self.find_all::<locations::Entity, _>(&ids).await
    }

    async fn find_skills(&self, ids: &[SkillId]) -> Result<Vec<Skill>, DomainError> {
        let ids: Vec<i32> = ids.iter().map(|id| id.0).collect();
        self.find_all::<skills::Entity, _>(&ids).await
    }
}

/// Convert SeaORM model to domain entity
impl From<branches::Model> for Branch {
    fn from(model: branches::Model) -> Self {
        Branch {
            id: BranchId(model.id),
            name: model.name,
        }
    }
}

/// Convert SeaORM model to domain entity
impl From<locations::Model> for Location {
    fn from(model: locations::Model) -> Self {
        Location {
            id: LocationId(model.id),
            name: model.name,
        }
    }
}

/// Convert SeaORM model to domain entity
impl From<skills::Model> for Skill {
    fn from(model: skills::Model) -> Self {
        Skill {
            id: SkillId(model.id),
            name: model.name,
        }
    }
}
