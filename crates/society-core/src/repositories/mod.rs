//! Repository traits (ports)

pub mod user_repository;
pub mod society_repository;
pub mod flat_repository;
pub mod tenant_repository;
pub mod bill_repository;
pub mod memory;

use std::sync::Arc;

pub use user_repository::UserRepository;
pub use society_repository::SocietyRepository;
pub use flat_repository::{FlatFilter, FlatRepository};
pub use tenant_repository::TenantRepository;
pub use bill_repository::{BillFilter, BillRepository};
pub use memory::MemoryStore;

/// One handle per record type, shared by every service.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub societies: Arc<dyn SocietyRepository>,
    pub flats: Arc<dyn FlatRepository>,
    pub tenants: Arc<dyn TenantRepository>,
    pub bills: Arc<dyn BillRepository>,
}

impl Repositories {
    /// Uses one store for every record type.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository + SocietyRepository + FlatRepository + TenantRepository + BillRepository + 'static,
    {
        Self {
            users: store.clone(),
            societies: store.clone(),
            flats: store.clone(),
            tenants: store.clone(),
            bills: store,
        }
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }
}
