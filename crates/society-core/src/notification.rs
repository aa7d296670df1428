//! Credential e-mail port
//!
//! Creation flows call [`deliver_credentials`] explicitly once the new
//! account has been committed. Delivery problems are logged and swallowed.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::{Role, User};
use society_shared::utils::mask_email;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Message build error: {0}")]
    BuildError(String),
    #[error("Template error: {0}")]
    TemplateError(String),
    #[error("Transport error: {0}")]
    TransportError(String),
}

/// Everything needed to tell a new user how to sign in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredentialNotice {
    pub recipient: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub password: String,
}

impl CredentialNotice {
    pub fn for_user(user: &User, password: &str) -> Self {
        Self {
            recipient: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
            password: password.to_string(),
        }
    }

    /// Account kind shown in the subject line.
    pub fn role_display(&self) -> &'static str {
        match self.role {
            Role::Owner => "Society Owner",
            Role::Tenant => "Tenant",
            Role::Admin => "User",
        }
    }

    /// Who the message says created the account.
    pub fn sender_title(&self) -> &'static str {
        match self.role {
            Role::Owner => "Society Administrator",
            Role::Tenant => "Flat Owner",
            Role::Admin => "Administrator",
        }
    }

    pub fn subject(&self) -> String {
        format!("Welcome to Society Management - Your {} Account", self.role_display())
    }

    /// Plain-text body, used when no template engine is configured.
    pub fn plain_body(&self) -> String {
        format!(
            "Hello {} {},\n\n\
             Your account has been successfully created by the {}.\n\n\
             Here are your login credentials:\n\
             --------------------------------\n\
             Email: {}\n\
             Password: {}\n\
             --------------------------------\n\n\
             Best regards,\n\
             Society Management Team",
            self.first_name,
            self.last_name,
            self.sender_title(),
            self.recipient,
            self.password
        )
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialNotifier: Send + Sync {
    async fn send_credentials(&self, notice: &CredentialNotice) -> Result<(), NotificationError>;
}

/// Sends the notice and logs the outcome; never fails the caller.
pub async fn deliver_credentials(notifier: &dyn CredentialNotifier, user: &User, password: &str) {
    let notice = CredentialNotice::for_user(user, password);
    match notifier.send_credentials(&notice).await {
        Ok(()) => info!("Credentials sent to {}", mask_email(&notice.recipient)),
        Err(e) => error!("Failed to send credentials to {}: {}", mask_email(&notice.recipient), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewAccount;

    fn user(role: Role) -> User {
        User::new(
            NewAccount {
                email: "kiran@example.com".into(),
                username: "kiran".into(),
                first_name: "Kiran".into(),
                last_name: "Rao".into(),
                phone: None,
                password: "pw".into(),
            },
            role,
            "hash".into(),
        )
        .unwrap()
    }

    #[test]
    fn test_wording_by_role() {
        let owner = CredentialNotice::for_user(&user(Role::Owner), "pw");
        assert_eq!(owner.subject(), "Welcome to Society Management - Your Society Owner Account");
        assert!(owner.plain_body().contains("created by the Society Administrator"));

        let tenant = CredentialNotice::for_user(&user(Role::Tenant), "pw");
        assert_eq!(tenant.subject(), "Welcome to Society Management - Your Tenant Account");
        assert!(tenant.plain_body().contains("created by the Flat Owner"));

        let admin = CredentialNotice::for_user(&user(Role::Admin), "pw");
        assert_eq!(admin.subject(), "Welcome to Society Management - Your User Account");
        assert_eq!(admin.sender_title(), "Administrator");
    }

    #[test]
    fn test_body_contains_credentials() {
        let body = CredentialNotice::for_user(&user(Role::Owner), "Tr1cky!").plain_body();
        assert!(body.starts_with("Hello Kiran Rao,"));
        assert!(body.contains("Email: kiran@example.com\n"));
        assert!(body.contains("Password: Tr1cky!\n"));
    }

    #[tokio::test]
    async fn test_delivery_failure_is_swallowed() {
        let mut notifier = MockCredentialNotifier::new();
        notifier
            .expect_send_credentials()
            .times(1)
            .returning(|_| Err(NotificationError::TransportError("connection refused".into())));

        deliver_credentials(&notifier, &user(Role::Tenant), "pw").await;
    }
}
