//! PostgreSQL adapter for CompanyRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};

use super::join_position;
use crate::domain::entities::{Branch, BranchId, Company, CompanyId, Location, LocationId};
use crate::domain::ports::CompanyRepository;
use crate::entity::{branches, companies, company_eligible_branches, company_locations, locations};
use crate::error::DomainError;

/// PostgreSQL implementation of CompanyRepository
pub struct PostgresCompanyRepository {
    db: DatabaseConnection,
}

impl PostgresCompanyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, DomainError> {
        let result = companies::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        match result {
            Some(model) => Ok(hydrate_companies(&self.db, vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Company>, DomainError> {
        let results = companies::Entity::find()
            .order_by_asc(companies::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        hydrate_companies(&self.db, results).await
    }

    async fn insert(&self, company: &Company) -> Result<Company, DomainError> {
        let txn = self.db.begin().await?;

        if companies::Entity::find_by_id(company.id.0)
            .one(&txn)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyExists(format!(
                "Company {} already exists",
                company.id
            )));
        }

        to_active_model(company)
            .insert(&txn)
            .await
            .map_err(|e| write_error(e, company.id))?;
        write_relations(&txn, company).await?;

        txn.commit().await?;

        tracing::debug!(company_id = %company.id, "Inserted company");
        Ok(company.clone())
    }

    async fn update(&self, company: &Company) -> Result<Company, DomainError> {
        let txn = self.db.begin().await?;

        if companies::Entity::find_by_id(company.id.0)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(DomainError::NotFound(format!(
                "Company {} not found",
                company.id
            )));
        }

        to_active_model(company)
            .update(&txn)
            .await
            .map_err(|e| write_error(e, company.id))?;
        write_relations(&txn, company).await?;

        txn.commit().await?;

        Ok(company.clone())
    }

    async fn delete(&self, id: &CompanyId) -> Result<(), DomainError> {
        // Join rows go with it (ON DELETE CASCADE)
        let result = companies::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            Err(DomainError::NotFound(format!("Company {} not found", id)))
        } else {
            Ok(())
        }
    }

    async fn eligible_branches(&self, id: &CompanyId) -> Result<Vec<Branch>, DomainError> {
        let rows = company_eligible_branches::Entity::find()
            .filter(company_eligible_branches::Column::CompanyId.eq(id.0))
            .find_also_related(branches::Entity)
            .order_by_asc(company_eligible_branches::Column::Position)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|(_, branch)| branch.map(Branch::from))
            .collect())
    }

    async fn locations(&self, id: &CompanyId) -> Result<Vec<Location>, DomainError> {
        let rows = company_locations::Entity::find()
            .filter(company_locations::Column::CompanyId.eq(id.0))
            .find_also_related(locations::Entity)
            .order_by_asc(company_locations::Column::Position)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|(_, location)| location.map(Location::from))
            .collect())
    }
}

/// Attach relationship ids to a batch of company rows.
///
/// Issues one query per join table regardless of batch size.
pub(super) async fn hydrate_companies<C: ConnectionTrait>(
    conn: &C,
    models: Vec<companies::Model>,
) -> Result<Vec<Company>, DomainError> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

    let branch_rows = company_eligible_branches::Entity::find()
        .filter(company_eligible_branches::Column::CompanyId.is_in(ids.clone()))
        .order_by_asc(company_eligible_branches::Column::CompanyId)
        .order_by_asc(company_eligible_branches::Column::Position)
        .all(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    let location_rows = company_locations::Entity::find()
        .filter(company_locations::Column::CompanyId.is_in(ids))
        .order_by_asc(company_locations::Column::CompanyId)
        .order_by_asc(company_locations::Column::Position)
        .all(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    let mut branches_by_company: HashMap<i32, Vec<BranchId>> = HashMap::new();
    for row in branch_rows {
        branches_by_company
            .entry(row.company_id)
            .or_default()
            .push(BranchId(row.branch_id));
    }

    let mut locations_by_company: HashMap<i32, Vec<LocationId>> = HashMap::new();
    for row in location_rows {
        locations_by_company
            .entry(row.company_id)
            .or_default()
            .push(LocationId(row.location_id));
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let branches = branches_by_company.remove(&model.id).unwrap_or_default();
            let locations = locations_by_company.remove(&model.id).unwrap_or_default();
            into_company(model, branches, locations)
        })
        .collect())
}

/// Replace the join rows for both of a company's relationships
async fn write_relations<C: ConnectionTrait>(
    conn: &C,
    company: &Company,
) -> Result<(), DomainError> {
    let id = company.id;

    company_eligible_branches::Entity::delete_many()
        .filter(company_eligible_branches::Column::CompanyId.eq(id.0))
        .exec(conn)
        .await
        .map_err(|e| write_error(e, id))?;

    if !company.eligible_branches.is_empty() {
        let rows = company
            .eligible_branches
            .iter()
            .enumerate()
            .map(|(index, branch)| {
                Ok(company_eligible_branches::ActiveModel {
                    company_id: Set(id.0),
                    position: Set(join_position(index)?),
                    branch_id: Set(branch.0),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        company_eligible_branches::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(|e| write_error(e, id))?;
    }

    company_locations::Entity::delete_many()
        .filter(company_locations::Column::CompanyId.eq(id.0))
        .exec(conn)
        .await
        .map_err(|e| write_error(e, id))?;

    if !company.locations.is_empty() {
        let rows = company
            .locations
            .iter()
            .enumerate()
            .map(|(index, location)| {
                Ok(company_locations::ActiveModel {
                    company_id: Set(id.0),
                    position: Set(join_position(index)?),
                    location_id: Set(location.0),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        company_locations::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(|e| write_error(e, id))?;
    }

    Ok(())
}

fn write_error(e: DbErr, id: CompanyId) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::AlreadyExists(format!("Company {} already exists", id))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => DomainError::Validation(format!(
            "Company {} references an unknown branch or location: {}",
            id, msg
        )),
        _ => DomainError::Database(e.to_string()),
    }
}

fn to_active_model(company: &Company) -> companies::ActiveModel {
    companies::ActiveModel {
        id: Set(company.id.0),
        name: Set(company.name.clone()),
        stipend: Set(company.stipend),
        ctc: Set(company.ctc),
        link_to_apply: Set(company.link_to_apply.clone()),
        cgpa_cutoff: Set(company.cgpa_cutoff),
        last_date_to_apply: Set(company.last_date_to_apply),
    }
}

/// Convert SeaORM model plus relationship ids to domain entity
fn into_company(
    model: companies::Model,
    eligible_branches: Vec<BranchId>,
    locations: Vec<LocationId>,
) -> Company {
    Company {
        id: CompanyId(model.id),
        name: model.name,
        stipend: model.stipend,
        ctc: model.ctc,
        link_to_apply: model.link_to_apply,
        cgpa_cutoff: model.cgpa_cutoff,
        eligible_branches,
        locations,
        last_date_to_apply: model.last_date_to_apply,
    }
}
