// ============================================================================
// Society Core - Authentication Service
// File: crates/society-core/src/services/auth_service.rs
// ============================================================================
//! Sign-in by e-mail or username, session resolution and superuser bootstrap

use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::authorization::CurrentUser;
use crate::domain::{NewAccount, Role, User};
use crate::error::DomainError;
use crate::repositories::UserRepository;
use super::hash_password;
use society_security::{JwtService, PasswordService};
use society_shared::utils::mask_email;

/// Authentication service for the login form and the session cookie
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    pub fn session_expiry(&self) -> i64 {
        self.jwt.session_expiry()
    }

    /// Login with an e-mail address or a username
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginResult, DomainError> {
        let identifier = identifier.trim();
        info!("Login attempt for: {}", mask_email(identifier));

        // 1. Username first, then e-mail
        let user = match self.users.find_by_username(identifier).await? {
            Some(user) => Some(user),
            None => self.users.find_by_email(identifier).await?,
        };
        let user = user.ok_or_else(|| {
            warn!("Login failed: unknown account: {}", mask_email(identifier));
            DomainError::InvalidCredentials
        })?;

        // 2. Verify password
        let password_valid = PasswordService::verify(password, &user.password_hash)
            .map_err(|_| DomainError::InvalidCredentials)?;
        if !password_valid {
            warn!("Login failed: invalid password for user {}", user.id);
            return Err(DomainError::InvalidCredentials);
        }

        // 3. Inactive accounts cannot sign in
        if !user.is_active {
            warn!("Login failed: user {} is inactive", user.id);
            return Err(DomainError::UserNotActive);
        }

        // 4. Issue the session token
        let token = self
            .jwt
            .generate_session_token(&user.id, user.role.as_str())
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        // 5. Update last login
        let mut updated_user = user;
        updated_user.record_login();
        if let Err(e) = self.users.update(&updated_user).await {
            error!("Failed to update last login: {}", e);
        }

        info!("Login successful for user {}", updated_user.id);
        Ok(LoginResult {
            user: CurrentUser::from(&updated_user),
            token,
        })
    }

    /// Resolves a session token to an active account. Any failure means "not signed in".
    pub async fn resolve_session(&self, token: &str) -> Option<CurrentUser> {
        let claims = self.jwt.validate_token(token).ok()?;
        let user_id: Uuid = claims.user_id().ok()?;
        match self.users.find_by_id(&user_id).await {
            Ok(Some(user)) if user.is_active => Some(CurrentUser::from(&user)),
            Ok(_) => None,
            Err(e) => {
                error!("Failed to load session user {}: {}", user_id, e);
                None
            }
        }
    }

    /// Creates an active ADMIN superuser; used by the command line.
    pub async fn create_superuser(&self, account: NewAccount) -> Result<User, DomainError> {
        let password_hash = hash_password(&account.password)?;
        let user = User::new_superuser(account, password_hash)?;
        let created = self
            .users
            .create(&user)
            .await
            .map_err(|e| e.on_conflict("A user with this email or username already exists."))?;
        info!("Superuser created: {}", mask_email(&created.email));
        Ok(created)
    }
}

/// Result of successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: CurrentUser,
    pub token: String,
}

impl LoginResult {
    pub fn role(&self) -> Role {
        self.user.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()), JwtService::new("test-secret", 3600))
    }

    fn account(password: &str) -> NewAccount {
        NewAccount {
            email: "Admin@Example.com".into(),
            username: "root".into(),
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_login_by_email_or_username() {
        let auth = service();
        auth.create_superuser(account("s3cret")).await.unwrap();

        let by_email = auth.login("admin@example.com", "s3cret").await.unwrap();
        assert_eq!(by_email.role(), Role::Admin);

        let by_username = auth.login("root", "s3cret").await.unwrap();
        let session = auth.resolve_session(&by_username.token).await.unwrap();
        assert_eq!(session.email, "admin@example.com");
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let auth = service();
        auth.create_superuser(account("s3cret")).await.unwrap();
        let err = auth.login("root", "nope").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
        assert!(matches!(auth.login("ghost", "s3cret").await.unwrap_err(), DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_inactive_account_rejected() {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(store.clone(), JwtService::new("test-secret", 3600));
        let mut user = auth.create_superuser(account("s3cret")).await.unwrap();
        user.toggle_active();
        UserRepository::update(store.as_ref(), &user).await.unwrap();

        assert!(matches!(auth.login("root", "s3cret").await.unwrap_err(), DomainError::UserNotActive));
    }

    #[tokio::test]
    async fn test_garbage_token_is_not_a_session() {
        assert!(service().resolve_session("not-a-jwt").await.is_none());
    }
}
