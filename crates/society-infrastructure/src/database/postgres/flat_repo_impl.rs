// ============================================================================
// Society Infrastructure - PostgreSQL Flat Repository
// File: crates/society-infrastructure/src/database/postgres/flat_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use society_core::domain::{Flat, FlatDetail, UserSummary};
use society_core::error::DomainError;
use society_core::repositories::{FlatFilter, FlatRepository};
use super::{map_db_error, not_found};

pub struct PgFlatRepository {
    pool: PgPool,
}

impl PgFlatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct FlatRow {
    pub id: Uuid,
    pub society_id: Uuid,
    pub flat_number: String,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<FlatRow> for Flat {
    fn from(row: FlatRow) -> Self {
        Flat {
            id: row.id,
            society_id: row.society_id,
            flat_number: row.flat_number,
            owner_id: row.owner_id,
            created_at: row.created_at,
        }
    }
}

/// Owner columns selected by a LEFT JOIN on users.
#[derive(Debug, FromRow)]
pub(crate) struct OwnerColumns {
    pub owner_first_name: Option<String>,
    pub owner_last_name: Option<String>,
    pub owner_email: Option<String>,
    pub owner_phone: Option<String>,
}

impl OwnerColumns {
    pub(crate) fn summary(self, owner_id: Option<Uuid>) -> Option<UserSummary> {
        let id = owner_id?;
        let email = self.owner_email?;
        Some(UserSummary::new(
            id,
            self.owner_first_name.as_deref().unwrap_or_default(),
            self.owner_last_name.as_deref().unwrap_or_default(),
            email,
            self.owner_phone,
        ))
    }
}

#[derive(Debug, FromRow)]
struct FlatDetailRow {
    #[sqlx(flatten)]
    pub flat: FlatRow,
    pub society_name: String,
    #[sqlx(flatten)]
    pub owner: OwnerColumns,
}

impl From<FlatDetailRow> for FlatDetail {
    fn from(row: FlatDetailRow) -> Self {
        let owner = row.owner.summary(row.flat.owner_id);
        FlatDetail {
            flat: row.flat.into(),
            society_name: row.society_name,
            owner,
        }
    }
}

const FLAT_DETAIL_SELECT: &str = r#"
    SELECT f.id, f.society_id, f.flat_number, f.owner_id, f.created_at,
           s.name AS society_name,
           u.first_name AS owner_first_name, u.last_name AS owner_last_name,
           u.email AS owner_email, u.phone AS owner_phone
    FROM flats f
    JOIN societies s ON s.id = f.society_id
    LEFT JOIN users u ON u.id = f.owner_id
    WHERE (f.owner_id = $1 OR $1 IS NULL)
      AND (f.owner_id IS NOT NULL OR NOT $2)
"#;

#[async_trait]
impl FlatRepository for PgFlatRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Flat>, DomainError> {
        let row: Option<FlatRow> =
            sqlx::query_as("SELECT id, society_id, flat_number, owner_id, created_at FROM flats WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_db_error("finding flat", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_number(&self, society_id: &Uuid, flat_number: &str) -> Result<Option<Flat>, DomainError> {
        let row: Option<FlatRow> = sqlx::query_as(
            "SELECT id, society_id, flat_number, owner_id, created_at FROM flats WHERE society_id = $1 AND flat_number = $2",
        )
        .bind(society_id)
        .bind(flat_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("finding flat by number", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(&self, filter: &FlatFilter) -> Result<Vec<FlatDetail>, DomainError> {
        let rows: Vec<FlatDetailRow> = sqlx::query_as(&format!("{} ORDER BY f.created_at DESC", FLAT_DETAIL_SELECT))
            .bind(filter.owner_id)
            .bind(filter.assigned_only)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("listing flats", e))?;

        Ok(rows.into_iter().map(FlatDetail::from).collect())
    }

    async fn count(&self, filter: &FlatFilter) -> Result<i64, DomainError> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM flats WHERE (owner_id = $1 OR $1 IS NULL) AND (owner_id IS NOT NULL OR NOT $2)",
        )
        .bind(filter.owner_id)
        .bind(filter.assigned_only)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("counting flats", e))
    }

    async fn create(&self, flat: &Flat) -> Result<Flat, DomainError> {
        sqlx::query(
            "INSERT INTO flats (id, society_id, flat_number, owner_id, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(flat.id)
        .bind(flat.society_id)
        .bind(&flat.flat_number)
        .bind(flat.owner_id)
        .bind(flat.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("creating flat", e))?;
        Ok(flat.clone())
    }

    async fn update(&self, flat: &Flat) -> Result<Flat, DomainError> {
        let result = sqlx::query("UPDATE flats SET society_id = $2, flat_number = $3, owner_id = $4 WHERE id = $1")
            .bind(flat.id)
            .bind(flat.society_id)
            .bind(&flat.flat_number)
            .bind(flat.owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("updating flat", e))?;
        if result.rows_affected() == 0 {
            return Err(not_found("Flat"));
        }
        Ok(flat.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM flats WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("deleting flat", e))?;
        if result.rows_affected() == 0 {
            return Err(not_found("Flat"));
        }
        Ok(())
    }
}
