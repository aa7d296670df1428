//! Domain services (business logic)

pub mod auth_service;
pub mod owner_service;
pub mod society_service;
pub mod flat_service;
pub mod bill_service;
pub mod tenant_service;
pub mod dashboard_service;

pub use auth_service::{AuthService, LoginResult};
pub use owner_service::OwnerService;
pub use society_service::SocietyService;
pub use flat_service::{FlatAssignment, FlatService};
pub use bill_service::BillService;
pub use tenant_service::{NewTenant, TenantService, TenantUpdate};
pub use dashboard_service::{AdminDashboard, DashboardService, OwnedFlat, OwnerDashboard, TenantOverview};

use crate::error::DomainError;
use society_security::PasswordService;

pub(crate) fn hash_password(password: &str) -> Result<String, DomainError> {
    PasswordService::hash(password).map_err(|e| DomainError::PasswordHashError(e.to_string()))
}
