//! Tenant management, scoped to the signed-in owner's flats
//!
//! Every lookup goes through the owner's flats, so an owner can never read
//! or change another owner's tenants. Account and lease are written together.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{AccountUpdate, Flat, FlatDetail, LeaseTerms, NewAccount, Role, Tenant, TenantDetail, User};
use crate::error::DomainError;
use crate::notification::{deliver_credentials, CredentialNotifier};
use crate::repositories::{FlatFilter, FlatRepository, Repositories, TenantRepository, UserRepository};
use crate::validation::{ValidationReport, Violation};
use super::hash_password;
use society_shared::utils::mask_email;

/// Submitted create-tenant form.
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub account: NewAccount,
    pub lease: LeaseTerms,
}

/// Submitted update-tenant form.
#[derive(Debug, Clone)]
pub struct TenantUpdate {
    pub account: AccountUpdate,
    pub lease: LeaseTerms,
}

pub struct TenantService {
    tenants: Arc<dyn TenantRepository>,
    flats: Arc<dyn FlatRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn CredentialNotifier>,
}

impl TenantService {
    pub fn new(repos: &Repositories, notifier: Arc<dyn CredentialNotifier>) -> Self {
        Self {
            tenants: repos.tenants.clone(),
            flats: repos.flats.clone(),
            users: repos.users.clone(),
            notifier,
        }
    }

    pub async fn list(&self, owner_id: &Uuid) -> Result<Vec<TenantDetail>, DomainError> {
        self.tenants.list(Some(owner_id)).await
    }

    /// Flats the owner can place a tenant in.
    pub async fn owner_flats(&self, owner_id: &Uuid) -> Result<Vec<FlatDetail>, DomainError> {
        self.flats.list(&FlatFilter::owned_by(*owner_id)).await
    }

    /// Creates the TENANT account and its lease in one write, then mails the credentials.
    pub async fn create(&self, owner_id: &Uuid, input: NewTenant) -> Result<User, DomainError> {
        let flat = self.owned_flat(owner_id, &input.lease.flat_id).await?;
        let password = input.account.password.clone();
        let password_hash = hash_password(&password)?;

        let user = User::new(input.account, Role::Tenant, password_hash)?;
        let tenant = Tenant::new(&user, LeaseTerms { flat_id: flat.id, ..input.lease })?;
        if self.tenants.has_active_lease(&user.id).await? {
            return Err(ValidationReport::single(Violation::field("user", "This user is already an active tenant")).into());
        }

        self.tenants.create_with_user(&user, &tenant).await.map_err(|e| {
            e.on_conflict("A user with this email or username already exists, or the flat already has an active tenant.")
        })?;
        info!("Tenant {} created for flat {}", mask_email(&user.email), flat.flat_number);

        deliver_credentials(self.notifier.as_ref(), &user, &password).await;
        Ok(user)
    }

    pub async fn update(&self, owner_id: &Uuid, tenant_id: &Uuid, input: TenantUpdate) -> Result<User, DomainError> {
        let (mut tenant, mut user) = self.find(owner_id, tenant_id).await?;
        let flat = self.owned_flat(owner_id, &input.lease.flat_id).await?;

        let mut report = ValidationReport::new();
        if let Err(errors) = user.apply_update(input.account) {
            report.merge(errors);
        }
        if let Err(errors) = tenant.apply_terms(&user, LeaseTerms { flat_id: flat.id, ..input.lease }) {
            report.merge(errors);
        }
        report.into_result()?;

        self.tenants
            .update_with_user(&user, &tenant)
            .await
            .map_err(|e| e.on_conflict("Email or Username already in use."))?;
        info!("Tenant {} updated", tenant.id);
        Ok(user)
    }

    /// Removes the lease and its account together.
    pub async fn delete(&self, owner_id: &Uuid, tenant_id: &Uuid) -> Result<User, DomainError> {
        let (tenant, user) = self.find(owner_id, tenant_id).await?;
        self.tenants.delete_with_user(&tenant.id, &user.id).await?;
        info!("Tenant {} deleted with account {}", tenant.id, user.id);
        Ok(user)
    }

    pub async fn toggle_status(&self, owner_id: &Uuid, tenant_id: &Uuid) -> Result<(Tenant, User), DomainError> {
        let (mut tenant, user) = self.find(owner_id, tenant_id).await?;
        tenant.toggle_active();
        let tenant = self.tenants.update(&tenant).await?;
        Ok((tenant, user))
    }

    /// Lease and account, provided the lease is on one of the owner's flats.
    pub async fn find(&self, owner_id: &Uuid, tenant_id: &Uuid) -> Result<(Tenant, User), DomainError> {
        let not_found = || DomainError::NotFound("Tenant not found.".into());
        let tenant = self.tenants.find_by_id(tenant_id).await?.ok_or_else(not_found)?;
        let flat = self.flats.find_by_id(&tenant.flat_id).await?.ok_or_else(not_found)?;
        if !flat.is_owned_by(owner_id) {
            return Err(not_found());
        }
        let user = self.users.find_by_id(&tenant.user_id).await?.ok_or_else(not_found)?;
        Ok((tenant, user))
    }

    async fn owned_flat(&self, owner_id: &Uuid, flat_id: &Uuid) -> Result<Flat, DomainError> {
        self.flats
            .find_by_id(flat_id)
            .await?
            .filter(|flat| flat.is_owned_by(owner_id))
            .ok_or_else(|| DomainError::NotFound("Invalid Flat selected.".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Society;
    use crate::notification::MockCredentialNotifier;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    struct Fixture {
        repos: Repositories,
        owner: User,
        flat: Flat,
    }

    fn person(name: &str) -> NewAccount {
        NewAccount {
            email: format!("{}@example.com", name),
            username: name.into(),
            first_name: "Neha".into(),
            last_name: "Joshi".into(),
            phone: None,
            password: "Tenant@1".into(),
        }
    }

    async fn fixture() -> Fixture {
        let repos = Repositories::in_memory();
        let owner = User::new(person("owner"), Role::Owner, "hash".into()).unwrap();
        repos.users.create(&owner).await.unwrap();
        let society = Society::new("Sun City".into(), "99 MG Road, Bengaluru".into()).unwrap();
        repos.societies.create(&society).await.unwrap();
        let flat = Flat::new(society.id, "S-10".into(), Some(&owner)).unwrap();
        repos.flats.create(&flat).await.unwrap();
        Fixture { repos, owner, flat }
    }

    fn lease(flat: &Flat, start: (i32, u32, u32)) -> LeaseTerms {
        LeaseTerms {
            flat_id: flat.id,
            rent_amount: Decimal::new(1800000, 2),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: None,
        }
    }

    fn notifier(times: usize) -> Arc<MockCredentialNotifier> {
        let mut mock = MockCredentialNotifier::new();
        mock.expect_send_credentials()
            .withf(|n| n.role == Role::Tenant && n.sender_title() == "Flat Owner")
            .times(times)
            .returning(|_| Ok(()));
        Arc::new(mock)
    }

    #[tokio::test]
    async fn test_create_writes_account_and_lease() {
        let f = fixture().await;
        let service = TenantService::new(&f.repos, notifier(1));
        let user = service
            .create(&f.owner.id, NewTenant { account: person("neha"), lease: lease(&f.flat, (2024, 4, 1)) })
            .await
            .unwrap();

        assert_eq!(user.role, Role::Tenant);
        let listed = service.list(&f.owner.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].flat_number, "S-10");
        assert!(listed[0].tenant.is_active);
    }

    #[tokio::test]
    async fn test_start_before_2000_leaves_no_records() {
        let f = fixture().await;
        let service = TenantService::new(&f.repos, notifier(0));
        let err = service
            .create(&f.owner.id, NewTenant { account: person("old"), lease: lease(&f.flat, (1999, 1, 1)) })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Validation error: Start date cannot be before year 2000");
        assert!(f.repos.users.find_by_username("old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_leaves_no_lease() {
        let f = fixture().await;
        let service = TenantService::new(&f.repos, notifier(1));
        service
            .create(&f.owner.id, NewTenant { account: person("neha"), lease: lease(&f.flat, (2024, 4, 1)) })
            .await
            .unwrap();

        let mut clash = person("other");
        clash.email = "neha@example.com".into();
        let err = service
            .create(&f.owner.id, NewTenant { account: clash, lease: lease(&f.flat, (2024, 4, 1)) })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(f.repos.tenants.count_active(Some(&f.owner.id)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_other_owners_cannot_touch_tenant() {
        let f = fixture().await;
        let service = TenantService::new(&f.repos, notifier(1));
        service
            .create(&f.owner.id, NewTenant { account: person("neha"), lease: lease(&f.flat, (2024, 4, 1)) })
            .await
            .unwrap();
        let tenant_id = service.list(&f.owner.id).await.unwrap()[0].tenant.id;

        let stranger = Uuid::new_v4();
        assert!(matches!(service.toggle_status(&stranger, &tenant_id).await.unwrap_err(), DomainError::NotFound(_)));
        assert!(matches!(service.delete(&stranger, &tenant_id).await.unwrap_err(), DomainError::NotFound(_)));
        assert!(matches!(
            service
                .create(&stranger, NewTenant { account: person("x"), lease: lease(&f.flat, (2024, 4, 1)) })
                .await
                .unwrap_err(),
            DomainError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_update_toggle_and_delete() {
        let f = fixture().await;
        let service = TenantService::new(&f.repos, notifier(1));
        let user = service
            .create(&f.owner.id, NewTenant { account: person("neha"), lease: lease(&f.flat, (2024, 4, 1)) })
            .await
            .unwrap();
        let tenant_id = service.list(&f.owner.id).await.unwrap()[0].tenant.id;

        let update = TenantUpdate {
            account: AccountUpdate {
                email: user.email.clone(),
                username: user.username.clone(),
                first_name: "Neha".into(),
                last_name: "Kulkarni".into(),
                phone: Some("9123456780".into()),
            },
            lease: LeaseTerms { rent_amount: Decimal::new(2000000, 2), ..lease(&f.flat, (2024, 5, 1)) },
        };
        let updated = service.update(&f.owner.id, &tenant_id, update).await.unwrap();
        assert_eq!(updated.last_name, "Kulkarni");

        let (tenant, _) = service.toggle_status(&f.owner.id, &tenant_id).await.unwrap();
        assert!(!tenant.is_active);
        assert_eq!(tenant.rent_amount, Decimal::new(2000000, 2));

        service.delete(&f.owner.id, &tenant_id).await.unwrap();
        assert!(f.repos.users.find_by_id(&user.id).await.unwrap().is_none());
        assert!(service.list(&f.owner.id).await.unwrap().is_empty());
    }
}
