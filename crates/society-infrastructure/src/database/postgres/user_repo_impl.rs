// ============================================================================
// Society Infrastructure - PostgreSQL User Repository
// File: crates/society-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor, PgPool};
use tracing::info;
use uuid::Uuid;

use society_core::domain::{Role, User};
use society_core::error::DomainError;
use society_core::repositories::UserRepository;
use society_shared::utils::mask_email;
use super::{map_db_error, not_found};

pub(crate) const USER_COLUMNS: &str = "id, username, email, first_name, last_name, phone, role, \
     is_active, is_superuser, password_hash, date_joined, last_login";

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            role: Role::from_str(&row.role).unwrap_or_default(),
            is_active: row.is_active,
            is_superuser: row.is_superuser,
            password_hash: row.password_hash,
            date_joined: row.date_joined,
            last_login: row.last_login,
        }
    }
}

/// Shared with the tenant repository, which inserts accounts inside its transaction.
pub(crate) async fn insert_user<'e, E: PgExecutor<'e>>(executor: E, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (
            id, username, email, first_name, last_name, phone, role,
            is_active, is_superuser, password_hash, date_joined, last_login
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.phone)
    .bind(user.role.as_str())
    .bind(user.is_active)
    .bind(user.is_superuser)
    .bind(&user.password_hash)
    .bind(user.date_joined)
    .bind(user.last_login)
    .execute(executor)
    .await?;
    Ok(())
}

/// Returns the number of rows touched.
pub(crate) async fn update_user<'e, E: PgExecutor<'e>>(executor: E, user: &User) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET
            username = $2,
            email = $3,
            first_name = $4,
            last_name = $5,
            phone = $6,
            role = $7,
            is_active = $8,
            is_superuser = $9,
            password_hash = $10,
            last_login = $11
        WHERE id = $1
        "#,
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.phone)
    .bind(user.role.as_str())
    .bind(user.is_active)
    .bind(user.is_superuser)
    .bind(&user.password_hash)
    .bind(user.last_login)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("finding user by id", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE email = LOWER(TRIM($1))",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("finding user by email", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("finding user by username", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_by_role(&self, role: Role, active_only: bool) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE role = $1 AND (is_active OR NOT $2) ORDER BY date_joined DESC",
            USER_COLUMNS
        ))
        .bind(role.as_str())
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("listing users", e))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn count_by_role(&self, role: Role) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error("counting users", e))
    }

    async fn create(&self, user: &User) -> Result<User, DomainError> {
        info!("Creating user with email: {}", mask_email(&user.email));
        insert_user(&self.pool, user)
            .await
            .map_err(|e| map_db_error("creating user", e))?;
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let touched = update_user(&self.pool, user)
            .await
            .map_err(|e| map_db_error("updating user", e))?;
        if touched == 0 {
            return Err(not_found("User"));
        }
        Ok(user.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("deleting user", e))?;
        if result.rows_affected() == 0 {
            return Err(not_found("User"));
        }
        Ok(())
    }
}
