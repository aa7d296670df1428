//! Maintenance bill repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{BillDetail, BillStatus, MaintenanceBill, Month};
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, Default)]
pub struct BillFilter {
    pub owner_id: Option<Uuid>,
    pub status: Option<BillStatus>,
}

#[async_trait]
pub trait BillRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<MaintenanceBill>, DomainError>;
    async fn find_by_period(&self, flat_id: &Uuid, month: Month, year: i32) -> Result<Option<MaintenanceBill>, DomainError>;
    /// Newest year first, then newest created.
    async fn list(&self, filter: &BillFilter) -> Result<Vec<BillDetail>, DomainError>;
    /// Newest created first, at most `limit` rows.
    async fn recent(&self, filter: &BillFilter, limit: usize) -> Result<Vec<BillDetail>, DomainError>;
    async fn count(&self, filter: &BillFilter) -> Result<i64, DomainError>;
    async fn create(&self, bill: &MaintenanceBill) -> Result<MaintenanceBill, DomainError>;
    async fn update(&self, bill: &MaintenanceBill) -> Result<MaintenanceBill, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError>;
}
