//! Configuration management

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::constants::DEFAULT_SESSION_EXPIRY;
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
    pub mail: MailSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    /// `postgres://...`, or `memory:` for the in-process store.
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

impl DatabaseSettings {
    pub fn is_memory(&self) -> bool {
        self.url.starts_with("memory:")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub secret: String,
    pub expiry_seconds: i64,
    pub secure_cookie: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailSettings {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "society-server")?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_seconds", 3)?
            .set_default("session.expiry_seconds", DEFAULT_SESSION_EXPIRY)?
            .set_default("session.secure_cookie", false)?
            .set_default("mail.enabled", false)?
            .set_default("mail.smtp_host", "localhost")?
            .set_default("mail.smtp_port", 587)?
            .set_default("mail.from", "Society Management <noreply@society.local>")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        let config: AppConfig = config.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), AppError> {
        if self.session.secret.trim().is_empty() {
            return Err(AppError::InvalidSetting("session.secret must not be empty".into()));
        }
        if self.session.expiry_seconds <= 0 {
            return Err(AppError::InvalidSetting("session.expiry_seconds must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            app: AppSettings {
                env: "test".into(),
                host: "127.0.0.1".into(),
                port: 8080,
                name: "society-server".into(),
            },
            database: DatabaseSettings {
                url: "memory:".into(),
                max_connections: 1,
                acquire_timeout_seconds: 1,
            },
            session: SessionSettings {
                secret: "s3cret".into(),
                expiry_seconds: 60,
                secure_cookie: false,
            },
            mail: MailSettings {
                enabled: false,
                smtp_host: "localhost".into(),
                smtp_port: 25,
                username: None,
                password: None,
                from: "noreply@society.local".into(),
            },
        }
    }

    #[test]
    fn test_memory_url() {
        let config = sample();
        assert!(config.database.is_memory());
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_blank_secret_rejected() {
        let mut config = sample();
        config.session.secret = "  ".into();
        assert!(matches!(config.check(), Err(AppError::InvalidSetting(_))));
    }
}
