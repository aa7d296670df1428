//! PostgreSQL repository implementations

pub mod user_repo_impl;
pub mod society_repo_impl;
pub mod flat_repo_impl;
pub mod tenant_repo_impl;
pub mod bill_repo_impl;

pub use user_repo_impl::PgUserRepository;
pub use society_repo_impl::PgSocietyRepository;
pub use flat_repo_impl::PgFlatRepository;
pub use tenant_repo_impl::PgTenantRepository;
pub use bill_repo_impl::PgBillRepository;

use society_core::error::DomainError;
use tracing::error;

/// Maps a driver error to the domain. Unique and foreign-key violations
/// become `Conflict` carrying the constraint name.
pub(crate) fn map_db_error(context: &str, e: sqlx::Error) -> DomainError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() || db.is_foreign_key_violation() {
            let constraint = db.constraint().unwrap_or("unknown").to_string();
            tracing::warn!("Constraint {} rejected {}", constraint, context);
            return DomainError::Conflict(format!("violates constraint \"{}\"", constraint));
        }
    }
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

pub(crate) fn not_found(entity: &str) -> DomainError {
    DomainError::NotFound(format!("{} not found.", entity))
}
