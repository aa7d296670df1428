//! Owner account administration

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{AccountUpdate, NewAccount, Role, User};
use crate::error::DomainError;
use crate::notification::{deliver_credentials, CredentialNotifier};
use crate::repositories::UserRepository;
use super::hash_password;
use society_shared::utils::mask_email;

pub struct OwnerService {
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn CredentialNotifier>,
}

impl OwnerService {
    pub fn new(users: Arc<dyn UserRepository>, notifier: Arc<dyn CredentialNotifier>) -> Self {
        Self { users, notifier }
    }

    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.users.list_by_role(Role::Owner, false).await
    }

    /// Active owners, offered when assigning flats.
    pub async fn list_active(&self) -> Result<Vec<User>, DomainError> {
        self.users.list_by_role(Role::Owner, true).await
    }

    pub async fn find(&self, id: &Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .filter(|u| u.role == Role::Owner)
            .ok_or_else(|| DomainError::NotFound("Owner not found.".into()))
    }

    /// Creates an active OWNER account and e-mails the credentials.
    pub async fn create(&self, account: NewAccount) -> Result<User, DomainError> {
        let password = account.password.clone();
        let password_hash = hash_password(&password)?;
        let user = User::new(account, Role::Owner, password_hash)?;

        let created = self
            .users
            .create(&user)
            .await
            .map_err(|e| e.on_conflict("A user with this email or username already exists."))?;
        info!("Owner created: {}", mask_email(&created.email));

        deliver_credentials(self.notifier.as_ref(), &created, &password).await;
        Ok(created)
    }

    /// Updates profile fields; a present `new_password` is re-hashed.
    pub async fn update(
        &self,
        id: &Uuid,
        update: AccountUpdate,
        new_password: Option<String>,
    ) -> Result<User, DomainError> {
        let mut owner = self.find(id).await?;
        owner.apply_update(update)?;
        if let Some(password) = new_password {
            owner.password_hash = hash_password(&password)?;
        }

        let updated = self
            .users
            .update(&owner)
            .await
            .map_err(|e| e.on_conflict("The provided email or username is already in use by another account."))?;
        info!("Owner updated: {}", updated.id);
        Ok(updated)
    }

    /// Removes the account; flats it owned become unassigned.
    pub async fn delete(&self, id: &Uuid) -> Result<User, DomainError> {
        let owner = self.find(id).await?;
        self.users.delete(&owner.id).await.map_err(|e| {
            e.on_conflict("Cannot delete this owner because they are assigned to flats or have active records.")
        })?;
        info!("Owner deleted: {}", owner.id);
        Ok(owner)
    }

    pub async fn toggle_status(&self, id: &Uuid) -> Result<User, DomainError> {
        let mut owner = self.find(id).await?;
        owner.toggle_active();
        self.users.update(&owner).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{MockCredentialNotifier, NotificationError};
    use crate::repositories::MemoryStore;
    use fake::faker::internet::en::{SafeEmail, Username};
    use fake::faker::name::en::{FirstName, LastName};
    use fake::Fake;

    fn account() -> NewAccount {
        NewAccount {
            email: SafeEmail().fake(),
            username: Username().fake(),
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            phone: Some("+919876543210".into()),
            password: "Welcome@123".into(),
        }
    }

    fn service(notifier: MockCredentialNotifier) -> (OwnerService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (OwnerService::new(store.clone(), Arc::new(notifier)), store)
    }

    fn silent() -> MockCredentialNotifier {
        let mut notifier = MockCredentialNotifier::new();
        notifier.expect_send_credentials().returning(|_| Ok(()));
        notifier
    }

    #[tokio::test]
    async fn test_create_sends_owner_credentials_once() {
        let mut notifier = MockCredentialNotifier::new();
        notifier
            .expect_send_credentials()
            .withf(|n| n.role == Role::Owner && n.password == "Welcome@123")
            .times(1)
            .returning(|_| Ok(()));
        let (owners, _) = service(notifier);

        let owner = owners.create(account()).await.unwrap();
        assert_eq!(owner.role, Role::Owner);
        assert!(owner.is_active);
        assert_ne!(owner.password_hash, "Welcome@123");
    }

    #[tokio::test]
    async fn test_mail_failure_does_not_fail_creation() {
        let mut notifier = MockCredentialNotifier::new();
        notifier
            .expect_send_credentials()
            .returning(|_| Err(NotificationError::TransportError("smtp down".into())));
        let (owners, _) = service(notifier);

        assert!(owners.create(account()).await.is_ok());
        assert_eq!(owners.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_reports_conflict() {
        let (owners, _) = service(silent());
        let first = owners.create(account()).await.unwrap();

        let mut second = account();
        second.username = first.username.clone();
        let err = owners.create(second).await.unwrap_err();
        assert_eq!(err.to_string(), "A user with this email or username already exists.");
    }

    #[tokio::test]
    async fn test_missing_last_name_is_a_validation_error() {
        let (owners, _) = service(MockCredentialNotifier::new());
        let mut input = account();
        input.last_name = "  ".into();
        assert!(matches!(owners.create(input).await.unwrap_err(), DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_rehashes_only_when_password_given() {
        let (owners, _) = service(silent());
        let owner = owners.create(account()).await.unwrap();
        let update = AccountUpdate {
            email: owner.email.clone(),
            username: owner.username.clone(),
            first_name: "Renamed".into(),
            last_name: owner.last_name.clone(),
            phone: None,
        };

        let kept = owners.update(&owner.id, update.clone(), None).await.unwrap();
        assert_eq!(kept.password_hash, owner.password_hash);
        assert_eq!(kept.first_name, "Renamed");

        let changed = owners.update(&owner.id, update, Some("NewPass#1".into())).await.unwrap();
        assert_ne!(changed.password_hash, owner.password_hash);
    }

    #[tokio::test]
    async fn test_toggle_and_delete() {
        let (owners, _) = service(silent());
        let owner = owners.create(account()).await.unwrap();

        assert!(!owners.toggle_status(&owner.id).await.unwrap().is_active);
        assert!(owners.list_active().await.unwrap().is_empty());

        owners.delete(&owner.id).await.unwrap();
        assert!(matches!(owners.find(&owner.id).await.unwrap_err(), DomainError::NotFound(_)));
    }
}
