//! # Society Infrastructure
//! 
//! Database and mail implementations (adapters).

pub mod database;
pub mod mail;

pub use database::{create_pool, pg_repositories, MIGRATOR};
pub use mail::{notifier_from_settings, LogNotifier, SmtpNotifier};
