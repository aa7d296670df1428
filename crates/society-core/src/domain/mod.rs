//! # Society Core - Domain Module
//! 
//! Records of the society management application and their field rules.

pub mod user;
pub mod society;
pub mod flat;
pub mod tenant;
pub mod maintenance_bill;

// Re-export all entities and enums
pub use user::{AccountUpdate, NewAccount, Role, User, UserSummary};
pub use society::{Society, SocietySummary};
pub use flat::{Flat, FlatDetail};
pub use tenant::{LeaseTerms, Tenant, TenantDetail};
pub use maintenance_bill::{max_bill_year, BillDetail, BillStatus, BillTerms, MaintenanceBill, Month};
