//! Flat repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Flat, FlatDetail};
use crate::error::DomainError;

/// Narrows flat listings. The default matches every flat.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatFilter {
    pub owner_id: Option<Uuid>,
    pub assigned_only: bool,
}

impl FlatFilter {
    pub fn owned_by(owner_id: Uuid) -> Self {
        Self { owner_id: Some(owner_id), assigned_only: true }
    }

    pub fn assigned() -> Self {
        Self { owner_id: None, assigned_only: true }
    }

    pub fn matches(&self, flat: &Flat) -> bool {
        if self.assigned_only && flat.owner_id.is_none() {
            return false;
        }
        match self.owner_id {
            Some(owner) => flat.owner_id == Some(owner),
            None => true,
        }
    }
}

#[async_trait]
pub trait FlatRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Flat>, DomainError>;
    async fn find_by_number(&self, society_id: &Uuid, flat_number: &str) -> Result<Option<Flat>, DomainError>;
    /// Newest flats first.
    async fn list(&self, filter: &FlatFilter) -> Result<Vec<FlatDetail>, DomainError>;
    async fn count(&self, filter: &FlatFilter) -> Result<i64, DomainError>;
    async fn create(&self, flat: &Flat) -> Result<Flat, DomainError>;
    async fn update(&self, flat: &Flat) -> Result<Flat, DomainError>;
    /// Fails with `Conflict` while the flat has tenants or bills.
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError>;
}
