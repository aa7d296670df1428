//! User repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Role, User};
use crate::error::DomainError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    /// Newest accounts first.
    async fn list_by_role(&self, role: Role, active_only: bool) -> Result<Vec<User>, DomainError>;
    async fn count_by_role(&self, role: Role) -> Result<i64, DomainError>;
    async fn create(&self, user: &User) -> Result<User, DomainError>;
    async fn update(&self, user: &User) -> Result<User, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError>;
}
