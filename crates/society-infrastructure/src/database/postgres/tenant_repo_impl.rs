// ============================================================================
// Society Infrastructure - PostgreSQL Tenant Repository
// File: crates/society-infrastructure/src/database/postgres/tenant_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgExecutor, PgPool};
use tracing::info;
use uuid::Uuid;

use society_core::domain::{Role, Tenant, TenantDetail, User};
use society_core::error::DomainError;
use society_core::repositories::TenantRepository;
use super::user_repo_impl::{insert_user, update_user};
use super::{map_db_error, not_found};

pub struct PgTenantRepository {
    pool: PgPool,
}

impl PgTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct TenantRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub flat_id: Uuid,
    pub rent_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Tenant {
            id: row.id,
            user_id: row.user_id,
            flat_id: row.flat_id,
            rent_amount: row.rent_amount,
            start_date: row.start_date,
            end_date: row.end_date,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// Lease joined with the full account, flat number and society name.
#[derive(Debug, FromRow)]
struct TenantDetailRow {
    #[sqlx(flatten)]
    pub tenant: TenantRow,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub user_is_active: bool,
    pub is_superuser: bool,
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub flat_number: String,
    pub society_name: String,
}

impl From<TenantDetailRow> for TenantDetail {
    fn from(row: TenantDetailRow) -> Self {
        let user = User {
            id: row.tenant.user_id,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            role: Role::from_str(&row.role).unwrap_or_default(),
            is_active: row.user_is_active,
            is_superuser: row.is_superuser,
            password_hash: row.password_hash,
            date_joined: row.date_joined,
            last_login: row.last_login,
        };
        TenantDetail {
            tenant: row.tenant.into(),
            user,
            flat_number: row.flat_number,
            society_name: row.society_name,
        }
    }
}

const TENANT_COLUMNS: &str = "id, user_id, flat_id, rent_amount, start_date, end_date, is_active, created_at";

async fn insert_tenant<'e, E: PgExecutor<'e>>(executor: E, tenant: &Tenant) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO tenants (id, user_id, flat_id, rent_amount, start_date, end_date, is_active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(tenant.id)
    .bind(tenant.user_id)
    .bind(tenant.flat_id)
    .bind(tenant.rent_amount)
    .bind(tenant.start_date)
    .bind(tenant.end_date)
    .bind(tenant.is_active)
    .bind(tenant.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

async fn update_tenant<'e, E: PgExecutor<'e>>(executor: E, tenant: &Tenant) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE tenants
        SET flat_id = $2, rent_amount = $3, start_date = $4, end_date = $5, is_active = $6
        WHERE id = $1
        "#,
    )
    .bind(tenant.id)
    .bind(tenant.flat_id)
    .bind(tenant.rent_amount)
    .bind(tenant.start_date)
    .bind(tenant.end_date)
    .bind(tenant.is_active)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(&format!("SELECT {} FROM tenants WHERE id = $1", TENANT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("finding tenant", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_user(&self, user_id: &Uuid) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> =
            sqlx::query_as(&format!("SELECT {} FROM tenants WHERE user_id = $1", TENANT_COLUMNS))
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_db_error("finding tenant by user", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn has_active_lease(&self, user_id: &Uuid) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tenants WHERE user_id = $1 AND is_active)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error("checking active lease", e))
    }

    async fn list(&self, owner_id: Option<&Uuid>) -> Result<Vec<TenantDetail>, DomainError> {
        let rows: Vec<TenantDetailRow> = sqlx::query_as(
            r#"
            SELECT t.id, t.user_id, t.flat_id, t.rent_amount, t.start_date, t.end_date,
                   t.is_active, t.created_at,
                   u.username, u.email, u.first_name, u.last_name, u.phone, u.role,
                   u.is_active AS user_is_active, u.is_superuser, u.password_hash,
                   u.date_joined, u.last_login,
                   f.flat_number, s.name AS society_name
            FROM tenants t
            JOIN users u ON u.id = t.user_id
            JOIN flats f ON f.id = t.flat_id
            JOIN societies s ON s.id = f.society_id
            WHERE (f.owner_id = $1 OR $1 IS NULL)
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("listing tenants", e))?;

        Ok(rows.into_iter().map(TenantDetail::from).collect())
    }

    async fn count_active(&self, owner_id: Option<&Uuid>) -> Result<i64, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tenants t
            JOIN flats f ON f.id = t.flat_id
            WHERE t.is_active AND (f.owner_id = $1 OR $1 IS NULL)
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("counting tenants", e))
    }

    async fn update(&self, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let touched = update_tenant(&self.pool, tenant)
            .await
            .map_err(|e| map_db_error("updating tenant", e))?;
        if touched == 0 {
            return Err(not_found("Tenant"));
        }
        Ok(tenant.clone())
    }

    async fn create_with_user(&self, user: &User, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| map_db_error("starting transaction", e))?;

        insert_user(&mut *tx, user)
            .await
            .map_err(|e| map_db_error("creating tenant account", e))?;
        insert_tenant(&mut *tx, tenant)
            .await
            .map_err(|e| map_db_error("creating tenant", e))?;

        tx.commit().await.map_err(|e| map_db_error("committing tenant", e))?;
        info!("Tenant {} created with account {}", tenant.id, user.id);
        Ok(tenant.clone())
    }

    async fn update_with_user(&self, user: &User, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| map_db_error("starting transaction", e))?;

        let users = update_user(&mut *tx, user)
            .await
            .map_err(|e| map_db_error("updating tenant account", e))?;
        let tenants = update_tenant(&mut *tx, tenant)
            .await
            .map_err(|e| map_db_error("updating tenant", e))?;
        if users == 0 || tenants == 0 {
            return Err(not_found("Tenant"));
        }

        tx.commit().await.map_err(|e| map_db_error("committing tenant", e))?;
        Ok(tenant.clone())
    }

    async fn delete_with_user(&self, tenant_id: &Uuid, user_id: &Uuid) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| map_db_error("starting transaction", e))?;

        let removed = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error("deleting tenant", e))?;
        if removed.rows_affected() == 0 {
            return Err(not_found("Tenant"));
        }
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error("deleting tenant account", e))?;

        tx.commit().await.map_err(|e| map_db_error("committing tenant deletion", e))?;
        Ok(())
    }
}
