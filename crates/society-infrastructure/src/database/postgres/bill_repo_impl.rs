// ============================================================================
// Society Infrastructure - PostgreSQL Maintenance Bill Repository
// File: crates/society-infrastructure/src/database/postgres/bill_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use society_core::domain::{BillDetail, BillStatus, MaintenanceBill, Month};
use society_core::error::DomainError;
use society_core::repositories::{BillFilter, BillRepository};
use super::flat_repo_impl::OwnerColumns;
use super::{map_db_error, not_found};

pub struct PgBillRepository {
    pool: PgPool,
}

impl PgBillRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct BillRow {
    pub id: Uuid,
    pub flat_id: Uuid,
    pub month: String,
    pub year: i32,
    pub amount: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<BillRow> for MaintenanceBill {
    type Error = DomainError;

    fn try_from(row: BillRow) -> Result<Self, Self::Error> {
        let month = Month::from_str(&row.month)
            .ok_or_else(|| DomainError::DatabaseError(format!("Unknown month in bill {}: {}", row.id, row.month)))?;
        Ok(MaintenanceBill {
            id: row.id,
            flat_id: row.flat_id,
            month,
            year: row.year,
            amount: row.amount,
            status: BillStatus::from_str(&row.status).unwrap_or_default(),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct BillDetailRow {
    #[sqlx(flatten)]
    pub bill: BillRow,
    pub flat_number: String,
    pub society_name: String,
    pub owner_id: Option<Uuid>,
    #[sqlx(flatten)]
    pub owner: OwnerColumns,
}

impl TryFrom<BillDetailRow> for BillDetail {
    type Error = DomainError;

    fn try_from(row: BillDetailRow) -> Result<Self, Self::Error> {
        Ok(BillDetail {
            bill: row.bill.try_into()?,
            flat_number: row.flat_number,
            society_name: row.society_name,
            owner: row.owner.summary(row.owner_id),
        })
    }
}

const BILL_COLUMNS: &str = "id, flat_id, month, year, amount, status, created_at";

const BILL_DETAIL_SELECT: &str = r#"
    SELECT b.id, b.flat_id, b.month, b.year, b.amount, b.status, b.created_at,
           f.flat_number, s.name AS society_name, f.owner_id,
           u.first_name AS owner_first_name, u.last_name AS owner_last_name,
           u.email AS owner_email, u.phone AS owner_phone
    FROM maintenance_bills b
    JOIN flats f ON f.id = b.flat_id
    JOIN societies s ON s.id = f.society_id
    LEFT JOIN users u ON u.id = f.owner_id
"#;

const BILL_FILTER: &str = "(f.owner_id = $1 OR $1 IS NULL) AND (b.status = $2 OR $2 IS NULL)";

#[async_trait]
impl BillRepository for PgBillRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<MaintenanceBill>, DomainError> {
        let row: Option<BillRow> =
            sqlx::query_as(&format!("SELECT {} FROM maintenance_bills WHERE id = $1", BILL_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_db_error("finding bill", e))?;

        row.map(MaintenanceBill::try_from).transpose()
    }

    async fn find_by_period(&self, flat_id: &Uuid, month: Month, year: i32) -> Result<Option<MaintenanceBill>, DomainError> {
        let row: Option<BillRow> = sqlx::query_as(&format!(
            "SELECT {} FROM maintenance_bills WHERE flat_id = $1 AND month = $2 AND year = $3",
            BILL_COLUMNS
        ))
        .bind(flat_id)
        .bind(month.as_str())
        .bind(year)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("finding bill by period", e))?;

        row.map(MaintenanceBill::try_from).transpose()
    }

    async fn list(&self, filter: &BillFilter) -> Result<Vec<BillDetail>, DomainError> {
        let rows: Vec<BillDetailRow> = sqlx::query_as(&format!(
            "{} WHERE {} ORDER BY b.year DESC, b.created_at DESC",
            BILL_DETAIL_SELECT, BILL_FILTER
        ))
        .bind(filter.owner_id)
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("listing bills", e))?;

        rows.into_iter().map(BillDetail::try_from).collect()
    }

    async fn recent(&self, filter: &BillFilter, limit: usize) -> Result<Vec<BillDetail>, DomainError> {
        let rows: Vec<BillDetailRow> = sqlx::query_as(&format!(
            "{} WHERE {} ORDER BY b.created_at DESC LIMIT $3",
            BILL_DETAIL_SELECT, BILL_FILTER
        ))
        .bind(filter.owner_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("listing recent bills", e))?;

        rows.into_iter().map(BillDetail::try_from).collect()
    }

    async fn count(&self, filter: &BillFilter) -> Result<i64, DomainError> {
        sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM maintenance_bills b JOIN flats f ON f.id = b.flat_id WHERE {}",
            BILL_FILTER
        ))
        .bind(filter.owner_id)
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("counting bills", e))
    }

    async fn create(&self, bill: &MaintenanceBill) -> Result<MaintenanceBill, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO maintenance_bills (id, flat_id, month, year, amount, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(bill.id)
        .bind(bill.flat_id)
        .bind(bill.month.as_str())
        .bind(bill.year)
        .bind(bill.amount)
        .bind(bill.status.as_str())
        .bind(bill.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("creating bill", e))?;
        Ok(bill.clone())
    }

    async fn update(&self, bill: &MaintenanceBill) -> Result<MaintenanceBill, DomainError> {
        let result = sqlx::query(
            "UPDATE maintenance_bills SET flat_id = $2, month = $3, year = $4, amount = $5, status = $6 WHERE id = $1",
        )
        .bind(bill.id)
        .bind(bill.flat_id)
        .bind(bill.month.as_str())
        .bind(bill.year)
        .bind(bill.amount)
        .bind(bill.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("updating bill", e))?;
        if result.rows_affected() == 0 {
            return Err(not_found("Bill"));
        }
        Ok(bill.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM maintenance_bills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("deleting bill", e))?;
        if result.rows_affected() == 0 {
            return Err(not_found("Bill"));
        }
        Ok(())
    }
}
