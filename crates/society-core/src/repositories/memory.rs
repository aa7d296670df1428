//! In-memory store implementing every repository port
//!
//! Used by tests and by `memory:` database urls. Enforces the same unique
//! and referential constraints as the relational schema so services see
//! identical conflicts.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BillFilter, BillRepository, FlatFilter, FlatRepository, SocietyRepository, TenantRepository, UserRepository};
use crate::domain::{
    BillDetail, Flat, FlatDetail, MaintenanceBill, Month, Role, Society, SocietySummary, Tenant, TenantDetail, User,
};
use crate::error::DomainError;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    societies: Vec<Society>,
    flats: Vec<Flat>,
    tenants: Vec<Tenant>,
    bills: Vec<MaintenanceBill>,
}

fn conflict(constraint: &str) -> DomainError {
    DomainError::Conflict(format!("violates constraint \"{}\"", constraint))
}

fn missing(entity: &str) -> DomainError {
    DomainError::NotFound(format!("{} not found.", entity))
}

impl Tables {
    fn user(&self, id: &Uuid) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    fn flat(&self, id: &Uuid) -> Option<&Flat> {
        self.flats.iter().find(|f| &f.id == id)
    }

    fn society_name(&self, id: &Uuid) -> String {
        self.societies
            .iter()
            .find(|s| &s.id == id)
            .map(|s| s.name.clone())
            .unwrap_or_default()
    }

    fn check_user(&self, user: &User) -> Result<(), DomainError> {
        let others = self.users.iter().filter(|u| u.id != user.id);
        for other in others {
            if other.username == user.username {
                return Err(conflict("users_username_key"));
            }
            if other.email == user.email {
                return Err(conflict("users_email_key"));
            }
        }
        Ok(())
    }

    fn check_flat(&self, flat: &Flat) -> Result<(), DomainError> {
        if !self.societies.iter().any(|s| s.id == flat.society_id) {
            return Err(conflict("flats_society_id_fkey"));
        }
        if let Some(owner) = &flat.owner_id {
            if self.user(owner).is_none() {
                return Err(conflict("flats_owner_id_fkey"));
            }
        }
        let duplicate = self.flats.iter().any(|f| {
            f.id != flat.id && f.society_id == flat.society_id && f.flat_number == flat.flat_number
        });
        if duplicate {
            return Err(conflict("flats_society_id_flat_number_key"));
        }
        Ok(())
    }

    fn check_tenant(&self, tenant: &Tenant) -> Result<(), DomainError> {
        if self.user(&tenant.user_id).is_none() {
            return Err(conflict("tenants_user_id_fkey"));
        }
        if self.flat(&tenant.flat_id).is_none() {
            return Err(conflict("tenants_flat_id_fkey"));
        }
        if self.tenants.iter().any(|t| t.id != tenant.id && t.user_id == tenant.user_id) {
            return Err(conflict("tenants_user_id_key"));
        }
        Ok(())
    }

    fn check_bill(&self, bill: &MaintenanceBill) -> Result<(), DomainError> {
        if self.flat(&bill.flat_id).is_none() {
            return Err(conflict("maintenance_bills_flat_id_fkey"));
        }
        let duplicate = self.bills.iter().any(|b| {
            b.id != bill.id && b.flat_id == bill.flat_id && b.month == bill.month && b.year == bill.year
        });
        if duplicate {
            return Err(conflict("maintenance_bills_flat_id_month_year_key"));
        }
        Ok(())
    }

    fn upsert_user(&mut self, user: &User) -> Result<(), DomainError> {
        let slot = self.users.iter_mut().find(|u| u.id == user.id).ok_or_else(|| missing("User"))?;
        *slot = user.clone();
        Ok(())
    }

    fn flat_detail(&self, flat: &Flat) -> FlatDetail {
        FlatDetail {
            flat: flat.clone(),
            society_name: self.society_name(&flat.society_id),
            owner: flat.owner_id.and_then(|id| self.user(&id)).map(User::summary),
        }
    }

    fn tenant_detail(&self, tenant: &Tenant) -> Option<TenantDetail> {
        let user = self.user(&tenant.user_id)?;
        let flat = self.flat(&tenant.flat_id)?;
        Some(TenantDetail {
            tenant: tenant.clone(),
            user: user.clone(),
            flat_number: flat.flat_number.clone(),
            society_name: self.society_name(&flat.society_id),
        })
    }

    fn flat_owner(&self, flat_id: &Uuid) -> Option<Uuid> {
        self.flat(flat_id).and_then(|f| f.owner_id)
    }

    fn bill_matches(&self, bill: &MaintenanceBill, filter: &BillFilter) -> bool {
        if let Some(status) = filter.status {
            if bill.status != status {
                return false;
            }
        }
        match filter.owner_id {
            Some(owner) => self.flat_owner(&bill.flat_id) == Some(owner),
            None => true,
        }
    }

    fn bill_detail(&self, bill: &MaintenanceBill) -> Option<BillDetail> {
        let flat = self.flat(&bill.flat_id)?;
        Some(BillDetail {
            bill: bill.clone(),
            flat_number: flat.flat_number.clone(),
            society_name: self.society_name(&flat.society_id),
            owner: flat.owner_id.and_then(|id| self.user(&id)).map(User::summary),
        })
    }

    fn tenant_in_scope(&self, tenant: &Tenant, owner_id: Option<&Uuid>) -> bool {
        match owner_id {
            Some(owner) => self.flat_owner(&tenant.flat_id).as_ref() == Some(owner),
            None => true,
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.tables.read().await.user(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = email.trim().to_lowercase();
        Ok(self.tables.read().await.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self.tables.read().await.users.iter().find(|u| u.username == username).cloned())
    }

    async fn list_by_role(&self, role: Role, active_only: bool) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .rev()
            .filter(|u| u.role == role && (!active_only || u.is_active))
            .cloned()
            .collect())
    }

    async fn count_by_role(&self, role: Role) -> Result<i64, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().filter(|u| u.role == role).count() as i64)
    }

    async fn create(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_user(user)?;
        tables.users.push(user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_user(user)?;
        tables.upsert_user(user)?;
        Ok(user.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if tables.user(id).is_none() {
            return Err(missing("User"));
        }
        tables.users.retain(|u| &u.id != id);
        tables.tenants.retain(|t| &t.user_id != id);
        for flat in tables.flats.iter_mut().filter(|f| f.owner_id.as_ref() == Some(id)) {
            flat.owner_id = None;
        }
        Ok(())
    }
}

#[async_trait]
impl SocietyRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Society>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.societies.iter().find(|s| &s.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Society>, DomainError> {
        let tables = self.tables.read().await;
        let mut societies = tables.societies.clone();
        societies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(societies)
    }

    async fn list_with_flat_counts(&self) -> Result<Vec<SocietySummary>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .societies
            .iter()
            .rev()
            .map(|s| SocietySummary {
                society: s.clone(),
                flat_count: tables.flats.iter().filter(|f| f.society_id == s.id).count() as i64,
            })
            .collect())
    }

    async fn count(&self) -> Result<i64, DomainError> {
        Ok(self.tables.read().await.societies.len() as i64)
    }

    async fn create(&self, society: &Society) -> Result<Society, DomainError> {
        let mut tables = self.tables.write().await;
        tables.societies.push(society.clone());
        Ok(society.clone())
    }

    async fn update(&self, society: &Society) -> Result<Society, DomainError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .societies
            .iter_mut()
            .find(|s| s.id == society.id)
            .ok_or_else(|| missing("Society"))?;
        *slot = society.clone();
        Ok(society.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.societies.iter().any(|s| &s.id == id) {
            return Err(missing("Society"));
        }
        if tables.flats.iter().any(|f| &f.society_id == id) {
            return Err(conflict("flats_society_id_fkey"));
        }
        tables.societies.retain(|s| &s.id != id);
        Ok(())
    }
}

#[async_trait]
impl FlatRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Flat>, DomainError> {
        Ok(self.tables.read().await.flat(id).cloned())
    }

    async fn find_by_number(&self, society_id: &Uuid, flat_number: &str) -> Result<Option<Flat>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .flats
            .iter()
            .find(|f| &f.society_id == society_id && f.flat_number == flat_number)
            .cloned())
    }

    async fn list(&self, filter: &FlatFilter) -> Result<Vec<FlatDetail>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .flats
            .iter()
            .rev()
            .filter(|f| filter.matches(f))
            .map(|f| tables.flat_detail(f))
            .collect())
    }

    async fn count(&self, filter: &FlatFilter) -> Result<i64, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.flats.iter().filter(|f| filter.matches(f)).count() as i64)
    }

    async fn create(&self, flat: &Flat) -> Result<Flat, DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_flat(flat)?;
        tables.flats.push(flat.clone());
        Ok(flat.clone())
    }

    async fn update(&self, flat: &Flat) -> Result<Flat, DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_flat(flat)?;
        let slot = tables.flats.iter_mut().find(|f| f.id == flat.id).ok_or_else(|| missing("Flat"))?;
        *slot = flat.clone();
        Ok(flat.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if tables.flat(id).is_none() {
            return Err(missing("Flat"));
        }
        if tables.tenants.iter().any(|t| &t.flat_id == id) {
            return Err(conflict("tenants_flat_id_fkey"));
        }
        if tables.bills.iter().any(|b| &b.flat_id == id) {
            return Err(conflict("maintenance_bills_flat_id_fkey"));
        }
        tables.flats.retain(|f| &f.id != id);
        Ok(())
    }
}

#[async_trait]
impl TenantRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Tenant>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.tenants.iter().find(|t| &t.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: &Uuid) -> Result<Option<Tenant>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.tenants.iter().find(|t| &t.user_id == user_id).cloned())
    }

    async fn has_active_lease(&self, user_id: &Uuid) -> Result<bool, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.tenants.iter().any(|t| &t.user_id == user_id && t.is_active))
    }

    async fn list(&self, owner_id: Option<&Uuid>) -> Result<Vec<TenantDetail>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tenants
            .iter()
            .rev()
            .filter(|t| tables.tenant_in_scope(t, owner_id))
            .filter_map(|t| tables.tenant_detail(t))
            .collect())
    }

    async fn count_active(&self, owner_id: Option<&Uuid>) -> Result<i64, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tenants
            .iter()
            .filter(|t| t.is_active && tables.tenant_in_scope(t, owner_id))
            .count() as i64)
    }

    async fn update(&self, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_tenant(tenant)?;
        let slot = tables
            .tenants
            .iter_mut()
            .find(|t| t.id == tenant.id)
            .ok_or_else(|| missing("Tenant"))?;
        *slot = tenant.clone();
        Ok(tenant.clone())
    }

    async fn create_with_user(&self, user: &User, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_user(user)?;
        tables.users.push(user.clone());
        if let Err(e) = tables.check_tenant(tenant) {
            tables.users.retain(|u| u.id != user.id);
            return Err(e);
        }
        tables.tenants.push(tenant.clone());
        Ok(tenant.clone())
    }

    async fn update_with_user(&self, user: &User, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_user(user)?;
        tables.check_tenant(tenant)?;
        tables.upsert_user(user)?;
        let slot = tables
            .tenants
            .iter_mut()
            .find(|t| t.id == tenant.id)
            .ok_or_else(|| missing("Tenant"))?;
        *slot = tenant.clone();
        Ok(tenant.clone())
    }

    async fn delete_with_user(&self, tenant_id: &Uuid, user_id: &Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.tenants.iter().any(|t| &t.id == tenant_id) {
            return Err(missing("Tenant"));
        }
        tables.tenants.retain(|t| &t.id != tenant_id);
        tables.tenants.retain(|t| &t.user_id != user_id);
        tables.users.retain(|u| &u.id != user_id);
        Ok(())
    }
}

#[async_trait]
impl BillRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<MaintenanceBill>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.bills.iter().find(|b| &b.id == id).cloned())
    }

    async fn find_by_period(&self, flat_id: &Uuid, month: Month, year: i32) -> Result<Option<MaintenanceBill>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .bills
            .iter()
            .find(|b| &b.flat_id == flat_id && b.month == month && b.year == year)
            .cloned())
    }

    async fn list(&self, filter: &BillFilter) -> Result<Vec<BillDetail>, DomainError> {
        let tables = self.tables.read().await;
        let mut bills: Vec<&MaintenanceBill> = tables
            .bills
            .iter()
            .rev()
            .filter(|b| tables.bill_matches(b, filter))
            .collect();
        bills.sort_by(|a, b| b.year.cmp(&a.year));
        Ok(bills.into_iter().filter_map(|bill| tables.bill_detail(bill)).collect())
    }

    async fn recent(&self, filter: &BillFilter, limit: usize) -> Result<Vec<BillDetail>, DomainError> {
        let tables = self.tables.read().await;
        let mut bills: Vec<&MaintenanceBill> = tables
            .bills
            .iter()
            .rev()
            .filter(|b| tables.bill_matches(b, filter))
            .collect();
        bills.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bills
            .into_iter()
            .filter_map(|bill| tables.bill_detail(bill))
            .take(limit)
            .collect())
    }

    async fn count(&self, filter: &BillFilter) -> Result<i64, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.bills.iter().filter(|b| tables.bill_matches(b, filter)).count() as i64)
    }

    async fn create(&self, bill: &MaintenanceBill) -> Result<MaintenanceBill, DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_bill(bill)?;
        tables.bills.push(bill.clone());
        Ok(bill.clone())
    }

    async fn update(&self, bill: &MaintenanceBill) -> Result<MaintenanceBill, DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_bill(bill)?;
        let slot = tables.bills.iter_mut().find(|b| b.id == bill.id).ok_or_else(|| missing("Bill"))?;
        *slot = bill.clone();
        Ok(bill.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.bills.iter().any(|b| &b.id == id) {
            return Err(missing("Bill"));
        }
        tables.bills.retain(|b| &b.id != id);
        Ok(())
    }
}
