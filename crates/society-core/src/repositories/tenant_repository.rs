//! Tenant repository trait (port)
//!
//! The `*_with_user` methods write the lease and its account in a single
//! transaction.

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Tenant, TenantDetail, User};
use crate::error::DomainError;

#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Tenant>, DomainError>;
    async fn find_by_user(&self, user_id: &Uuid) -> Result<Option<Tenant>, DomainError>;
    async fn has_active_lease(&self, user_id: &Uuid) -> Result<bool, DomainError>;
    /// Leases on flats owned by `owner_id`, or every lease when `None`.
    async fn list(&self, owner_id: Option<&Uuid>) -> Result<Vec<TenantDetail>, DomainError>;
    async fn count_active(&self, owner_id: Option<&Uuid>) -> Result<i64, DomainError>;
    async fn update(&self, tenant: &Tenant) -> Result<Tenant, DomainError>;
    async fn create_with_user(&self, user: &User, tenant: &Tenant) -> Result<Tenant, DomainError>;
    async fn update_with_user(&self, user: &User, tenant: &Tenant) -> Result<Tenant, DomainError>;
    async fn delete_with_user(&self, tenant_id: &Uuid, user_id: &Uuid) -> Result<(), DomainError>;
}
