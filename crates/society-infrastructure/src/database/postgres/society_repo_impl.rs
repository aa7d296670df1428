// ============================================================================
// Society Infrastructure - PostgreSQL Society Repository
// File: crates/society-infrastructure/src/database/postgres/society_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use society_core::domain::{Society, SocietySummary};
use society_core::error::DomainError;
use society_core::repositories::SocietyRepository;
use super::{map_db_error, not_found};

pub struct PgSocietyRepository {
    pool: PgPool,
}

impl PgSocietyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SocietyRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<SocietyRow> for Society {
    fn from(row: SocietyRow) -> Self {
        Society {
            id: row.id,
            name: row.name,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SocietyCountRow {
    #[sqlx(flatten)]
    pub society: SocietyRow,
    pub flat_count: i64,
}

#[async_trait]
impl SocietyRepository for PgSocietyRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Society>, DomainError> {
        let row: Option<SocietyRow> = sqlx::query_as("SELECT id, name, address, created_at FROM societies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("finding society", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(&self) -> Result<Vec<Society>, DomainError> {
        let rows: Vec<SocietyRow> = sqlx::query_as("SELECT id, name, address, created_at FROM societies ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("listing societies", e))?;

        Ok(rows.into_iter().map(Society::from).collect())
    }

    async fn list_with_flat_counts(&self) -> Result<Vec<SocietySummary>, DomainError> {
        let rows: Vec<SocietyCountRow> = sqlx::query_as(
            r#"
            SELECT s.id, s.name, s.address, s.created_at, COUNT(f.id) AS flat_count
            FROM societies s
            LEFT JOIN flats f ON f.society_id = s.id
            GROUP BY s.id
            ORDER BY s.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("listing societies with flat counts", e))?;

        Ok(rows
            .into_iter()
            .map(|r| SocietySummary {
                society: r.society.into(),
                flat_count: r.flat_count,
            })
            .collect())
    }

    async fn count(&self) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM societies")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error("counting societies", e))
    }

    async fn create(&self, society: &Society) -> Result<Society, DomainError> {
        sqlx::query("INSERT INTO societies (id, name, address, created_at) VALUES ($1, $2, $3, $4)")
            .bind(society.id)
            .bind(&society.name)
            .bind(&society.address)
            .bind(society.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("creating society", e))?;
        Ok(society.clone())
    }

    async fn update(&self, society: &Society) -> Result<Society, DomainError> {
        let result = sqlx::query("UPDATE societies SET name = $2, address = $3 WHERE id = $1")
            .bind(society.id)
            .bind(&society.name)
            .bind(&society.address)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("updating society", e))?;
        if result.rows_affected() == 0 {
            return Err(not_found("Society"));
        }
        Ok(society.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM societies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("deleting society", e))?;
        if result.rows_affected() == 0 {
            return Err(not_found("Society"));
        }
        Ok(())
    }
}
