//! Password hashing with Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Password must not be empty")]
    EmptyPassword,
}

pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::EmptyPassword);
        }
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    /// Returns `Ok(false)` for a wrong password; `Err` only when the stored
    /// hash itself cannot be parsed.
    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash("s3cret-pass").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(PasswordService::verify("s3cret-pass", &hash).unwrap());
        assert!(!PasswordService::verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(matches!(PasswordService::hash(""), Err(PasswordError::EmptyPassword)));
    }

    #[test]
    fn test_garbage_hash_is_error() {
        assert!(PasswordService::verify("x", "not-a-hash").is_err());
    }
}
