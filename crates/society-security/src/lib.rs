//! # Society Security
//! 
//! Security utilities: password hashing, signed session tokens and the
//! session cookie helpers.

pub mod jwt;
pub mod password;
pub mod session;

pub use jwt::{JwtService, SessionClaims};
pub use password::PasswordService;
