//! # Society API
//!
//! Server-rendered pages and form handlers: role extractors, form parsing,
//! one-shot notices and the route table.

pub mod error;
pub mod extract;
pub mod forms;
pub mod handlers;
pub mod notice;
pub mod response;
pub mod router;
pub mod state;
pub mod views;

pub use router::build_router;
pub use state::AppState;
