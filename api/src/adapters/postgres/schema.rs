//! Explicit schema bootstrap
//!
//! Table definitions are derived from the SeaORM entities, so the entity
//! module is the single declaration of table names, columns and keys.

use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};

use crate::entity::prelude::*;

/// Create every table that does not exist yet.
///
/// Tables are created in dependency order: reference tables, then the two
/// records, then the join tables that point at them.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let statements = [
        create_table(&schema, Branches),
        create_table(&schema, Locations),
        create_table(&schema, Skills),
        create_table(&schema, Companies),
        create_table(&schema, Users),
        create_table(&schema, CompanyEligibleBranches),
        create_table(&schema, CompanyLocations),
        create_table(&schema, UserSkills),
        create_table(&schema, UserUpcomingCompanies),
        create_table(&schema, UserAppliedCompanies),
    ];

    for statement in statements.iter() {
        db.execute(backend.build(statement)).await?;
    }

    tracing::info!(tables = statements.len(), "Schema is up to date");
    Ok(())
}

fn create_table<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    statement
}
