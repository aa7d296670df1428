//! Read models for the three dashboards and the owner/tenant list pages

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{BillDetail, BillStatus, FlatDetail, Role, Society, TenantDetail, User, UserSummary};
use crate::error::DomainError;
use crate::repositories::{BillFilter, FlatFilter, Repositories};
use society_shared::constants::RECENT_ITEMS_LIMIT;

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub total_societies: i64,
    pub total_flats: i64,
    pub total_owners: i64,
    pub total_tenants: i64,
    pub total_bills: i64,
    pub unpaid_bills: i64,
    pub recent_owners: Vec<User>,
    pub recent_bills: Vec<BillDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OwnerDashboard {
    pub flats: Vec<FlatDetail>,
    pub total_flats: i64,
    pub total_tenants: i64,
    pub total_bills: i64,
    pub unpaid_bills: i64,
    pub recent_bills: Vec<BillDetail>,
}

/// One of the owner's flats with its active leases.
#[derive(Debug, Clone, Serialize)]
pub struct OwnedFlat {
    #[serde(flatten)]
    pub flat: FlatDetail,
    pub active_tenants: Vec<TenantDetail>,
}

/// What a tenant sees about their own lease.
#[derive(Debug, Clone, Serialize)]
pub struct TenantOverview {
    pub tenant: TenantDetail,
    pub society: Society,
    pub owner: Option<UserSummary>,
}

pub struct DashboardService {
    repos: Repositories,
}

impl DashboardService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn admin(&self) -> Result<AdminDashboard, DomainError> {
        let unpaid = BillFilter { status: Some(BillStatus::Unpaid), ..Default::default() };

        let mut recent_owners = self.repos.users.list_by_role(Role::Owner, false).await?;
        recent_owners.truncate(RECENT_ITEMS_LIMIT);

        let recent_bills = self.repos.bills.recent(&unpaid, RECENT_ITEMS_LIMIT).await?;

        Ok(AdminDashboard {
            total_societies: self.repos.societies.count().await?,
            total_flats: self.repos.flats.count(&FlatFilter::default()).await?,
            total_owners: self.repos.users.count_by_role(Role::Owner).await?,
            total_tenants: self.repos.tenants.count_active(None).await?,
            total_bills: self.repos.bills.count(&BillFilter::default()).await?,
            unpaid_bills: self.repos.bills.count(&unpaid).await?,
            recent_owners,
            recent_bills,
        })
    }

    pub async fn owner(&self, owner_id: &Uuid) -> Result<OwnerDashboard, DomainError> {
        let flats = self.repos.flats.list(&FlatFilter::owned_by(*owner_id)).await?;
        let bills = self.owner_bills(owner_id, None).await?;
        let unpaid_bills = bills.iter().filter(|b| b.bill.status == BillStatus::Unpaid).count() as i64;

        Ok(OwnerDashboard {
            total_flats: flats.len() as i64,
            total_tenants: self.repos.tenants.count_active(Some(owner_id)).await?,
            total_bills: bills.len() as i64,
            unpaid_bills,
            recent_bills: bills.into_iter().take(RECENT_ITEMS_LIMIT).collect(),
            flats,
        })
    }

    pub async fn owner_flats(&self, owner_id: &Uuid) -> Result<Vec<OwnedFlat>, DomainError> {
        let flats = self.repos.flats.list(&FlatFilter::owned_by(*owner_id)).await?;
        let leases = self.repos.tenants.list(Some(owner_id)).await?;
        Ok(flats
            .into_iter()
            .map(|flat| {
                let active_tenants = leases
                    .iter()
                    .filter(|t| t.tenant.is_active && t.tenant.flat_id == flat.flat.id)
                    .cloned()
                    .collect();
                OwnedFlat { flat, active_tenants }
            })
            .collect())
    }

    pub async fn owner_bills(&self, owner_id: &Uuid, status: Option<BillStatus>) -> Result<Vec<BillDetail>, DomainError> {
        self.repos
            .bills
            .list(&BillFilter { owner_id: Some(*owner_id), status })
            .await
    }

    /// `None` when the account has no lease yet.
    pub async fn tenant(&self, user_id: &Uuid) -> Result<Option<TenantOverview>, DomainError> {
        let Some(tenant) = self.repos.tenants.find_by_user(user_id).await? else {
            return Ok(None);
        };
        let Some(user) = self.repos.users.find_by_id(user_id).await? else {
            return Ok(None);
        };
        let Some(flat) = self.repos.flats.find_by_id(&tenant.flat_id).await? else {
            return Ok(None);
        };
        let Some(society) = self.repos.societies.find_by_id(&flat.society_id).await? else {
            return Ok(None);
        };
        let owner = match &flat.owner_id {
            Some(id) => self.repos.users.find_by_id(id).await?.map(|o| o.summary()),
            None => None,
        };

        Ok(Some(TenantOverview {
            tenant: TenantDetail {
                tenant,
                user,
                flat_number: flat.flat_number,
                society_name: society.name.clone(),
            },
            society,
            owner,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BillTerms, Flat, LeaseTerms, MaintenanceBill, Month, NewAccount, Tenant};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn account(name: &str) -> NewAccount {
        NewAccount {
            email: format!("{}@example.com", name),
            username: name.into(),
            first_name: "Ravi".into(),
            last_name: "Nair".into(),
            phone: None,
            password: "pw".into(),
        }
    }

    struct Seeded {
        repos: Repositories,
        owner: User,
        tenant_user: User,
    }

    async fn seed() -> Seeded {
        let repos = Repositories::in_memory();
        let owner = User::new(account("owner"), Role::Owner, "h".into()).unwrap();
        repos.users.create(&owner).await.unwrap();
        let society = Society::new("River Side".into(), "1 River Lane, Kochi".into()).unwrap();
        repos.societies.create(&society).await.unwrap();
        let flat = Flat::new(society.id, "R-1".into(), Some(&owner)).unwrap();
        repos.flats.create(&flat).await.unwrap();
        repos.flats.create(&Flat::new(society.id, "R-2".into(), None).unwrap()).await.unwrap();

        for (month, status) in [(Month::January, BillStatus::Paid), (Month::February, BillStatus::Unpaid)] {
            let terms = BillTerms { flat_id: flat.id, month, year: 2024, amount: Decimal::new(150000, 2), status };
            repos.bills.create(&MaintenanceBill::new(&flat, terms).unwrap()).await.unwrap();
        }

        let tenant_user = User::new(account("tenant"), Role::Tenant, "h".into()).unwrap();
        let lease = Tenant::new(
            &tenant_user,
            LeaseTerms {
                flat_id: flat.id,
                rent_amount: Decimal::new(1200000, 2),
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end_date: None,
            },
        )
        .unwrap();
        repos.tenants.create_with_user(&tenant_user, &lease).await.unwrap();
        Seeded { repos, owner, tenant_user }
    }

    #[tokio::test]
    async fn test_admin_counts() {
        let s = seed().await;
        let dashboard = DashboardService::new(s.repos).admin().await.unwrap();
        assert_eq!(dashboard.total_societies, 1);
        assert_eq!(dashboard.total_flats, 2);
        assert_eq!(dashboard.total_owners, 1);
        assert_eq!(dashboard.total_tenants, 1);
        assert_eq!(dashboard.total_bills, 2);
        assert_eq!(dashboard.unpaid_bills, 1);
        assert_eq!(dashboard.recent_bills.len(), 1);
    }

    #[tokio::test]
    async fn test_admin_recent_unpaid_bills_are_newest_three() {
        let s = seed().await;
        let flat = s.repos.flats.list(&FlatFilter::owned_by(s.owner.id)).await.unwrap().remove(0).flat;
        let base = chrono::Utc::now();
        for (offset, month) in [Month::March, Month::April, Month::May, Month::June].into_iter().enumerate() {
            let terms = BillTerms {
                flat_id: flat.id,
                month,
                year: 2024,
                amount: Decimal::new(150000, 2),
                status: BillStatus::Unpaid,
            };
            let mut bill = MaintenanceBill::new(&flat, terms).unwrap();
            bill.created_at = base + chrono::Duration::minutes(offset as i64 + 1);
            s.repos.bills.create(&bill).await.unwrap();
        }

        let dashboard = DashboardService::new(s.repos).admin().await.unwrap();
        assert_eq!(dashboard.unpaid_bills, 5);
        let months: Vec<Month> = dashboard.recent_bills.iter().map(|b| b.bill.month).collect();
        assert_eq!(months, vec![Month::June, Month::May, Month::April]);
    }

    #[tokio::test]
    async fn test_owner_views() {
        let s = seed().await;
        let service = DashboardService::new(s.repos);
        let dashboard = service.owner(&s.owner.id).await.unwrap();
        assert_eq!(dashboard.total_flats, 1);
        assert_eq!(dashboard.total_tenants, 1);
        assert_eq!((dashboard.total_bills, dashboard.unpaid_bills), (2, 1));

        let flats = service.owner_flats(&s.owner.id).await.unwrap();
        assert_eq!(flats[0].active_tenants.len(), 1);

        let paid = service.owner_bills(&s.owner.id, Some(BillStatus::Paid)).await.unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].bill.month, Month::January);
    }

    #[tokio::test]
    async fn test_tenant_overview() {
        let s = seed().await;
        let service = DashboardService::new(s.repos);
        let overview = service.tenant(&s.tenant_user.id).await.unwrap().unwrap();
        assert_eq!(overview.tenant.flat_number, "R-1");
        assert_eq!(overview.society.name, "River Side");
        assert_eq!(overview.owner.unwrap().email, "owner@example.com");

        assert!(service.tenant(&s.owner.id).await.unwrap().is_none());
    }
}
