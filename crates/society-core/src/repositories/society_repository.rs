//! Society repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Society, SocietySummary};
use crate::error::DomainError;

#[async_trait]
pub trait SocietyRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Society>, DomainError>;
    async fn list(&self) -> Result<Vec<Society>, DomainError>;
    async fn list_with_flat_counts(&self) -> Result<Vec<SocietySummary>, DomainError>;
    async fn count(&self) -> Result<i64, DomainError>;
    async fn create(&self, society: &Society) -> Result<Society, DomainError>;
    async fn update(&self, society: &Society) -> Result<Society, DomainError>;
    /// Fails with `Conflict` while the society still has flats.
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError>;
}
