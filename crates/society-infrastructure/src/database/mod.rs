//! Database module (PostgreSQL adapters)

pub mod connection;
pub mod postgres;

use std::sync::Arc;

use sqlx::migrate::Migrator;
use sqlx::PgPool;

use society_core::repositories::Repositories;

pub use connection::create_pool;
pub use postgres::{PgBillRepository, PgFlatRepository, PgSocietyRepository, PgTenantRepository, PgUserRepository};

/// Schema migrations embedded from `migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Every repository port backed by the same pool.
pub fn pg_repositories(pool: PgPool) -> Repositories {
    Repositories {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        societies: Arc::new(PgSocietyRepository::new(pool.clone())),
        flats: Arc::new(PgFlatRepository::new(pool.clone())),
        tenants: Arc::new(PgTenantRepository::new(pool.clone())),
        bills: Arc::new(PgBillRepository::new(pool)),
    }
}
