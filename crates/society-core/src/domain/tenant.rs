//! Tenant lease entity

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::user::{Role, User};
use crate::validation::{check_money_precision, rule_error, ValidationReport, Violation};
use society_shared::constants::MIN_LEASE_YEAR;

/// Lease terms submitted by an owner.
#[derive(Debug, Clone)]
pub struct LeaseTerms {
    pub flat_id: Uuid,
    pub rent_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_lease_period", skip_on_field_errors = false))]
pub struct Tenant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub flat_id: Uuid,

    #[validate(custom(function = "validate_rent_amount"))]
    pub rent_amount: Decimal,

    #[validate(custom(function = "validate_start_date"))]
    pub start_date: NaiveDate,

    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Lease joined with the tenant's account and flat.
#[derive(Debug, Clone, Serialize)]
pub struct TenantDetail {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub user: User,
    pub flat_number: String,
    pub society_name: String,
}

fn validate_rent_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(rule_error("rent_amount", "Rent amount must be greater than 0"));
    }
    check_money_precision(amount)
}

pub(crate) fn earliest_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(MIN_LEASE_YEAR, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn validate_start_date(start: &NaiveDate) -> Result<(), ValidationError> {
    if *start < earliest_start_date() {
        return Err(rule_error("start_date", "Start date cannot be before year 2000"));
    }
    Ok(())
}

fn validate_lease_period(tenant: &Tenant) -> Result<(), ValidationError> {
    match tenant.end_date {
        Some(end) if end <= tenant.start_date => {
            Err(rule_error("end_date", "End date must be after start date"))
        }
        _ => Ok(()),
    }
}

impl Tenant {
    /// New active lease for `user`, who must hold the TENANT role.
    pub fn new(user: &User, terms: LeaseTerms) -> Result<Self, ValidationReport> {
        let tenant = Self {
            id: Uuid::new_v4(),
            user_id: user.id,
            flat_id: terms.flat_id,
            rent_amount: terms.rent_amount,
            start_date: terms.start_date,
            end_date: terms.end_date,
            is_active: true,
            created_at: Utc::now(),
        };
        tenant.check(user)?;
        Ok(tenant)
    }

    pub fn apply_terms(&mut self, user: &User, terms: LeaseTerms) -> Result<(), ValidationReport> {
        self.flat_id = terms.flat_id;
        self.rent_amount = terms.rent_amount;
        self.start_date = terms.start_date;
        self.end_date = terms.end_date;
        self.check(user)
    }

    /// Field and cross-field rules plus the account role check.
    pub fn check(&self, user: &User) -> Result<(), ValidationReport> {
        let mut report = match self.validate() {
            Ok(()) => ValidationReport::new(),
            Err(errors) => errors.into(),
        };
        if user.role != Role::Tenant {
            report.push(Violation::field("user", "Selected user must have TENANT role"));
        }
        report.into_result()
    }

    pub fn toggle_active(&mut self) -> bool {
        self.is_active = !self.is_active;
        self.is_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::NewAccount;
    use std::str::FromStr;

    fn tenant_user(role: Role) -> User {
        User::new(
            NewAccount {
                email: "meera@example.com".into(),
                username: "meera".into(),
                first_name: "Meera".into(),
                last_name: "Iyer".into(),
                phone: Some("9876543210".into()),
                password: "secret".into(),
            },
            role,
            "hash".into(),
        )
        .unwrap()
    }

    fn terms(rent: &str, start: (i32, u32, u32), end: Option<(i32, u32, u32)>) -> LeaseTerms {
        LeaseTerms {
            flat_id: Uuid::new_v4(),
            rent_amount: Decimal::from_str(rent).unwrap(),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: end.map(|e| NaiveDate::from_ymd_opt(e.0, e.1, e.2).unwrap()),
        }
    }

    #[test]
    fn test_valid_lease() {
        let user = tenant_user(Role::Tenant);
        let tenant = Tenant::new(&user, terms("15000.00", (2024, 4, 1), Some((2025, 3, 31)))).unwrap();
        assert!(tenant.is_active);
        assert_eq!(tenant.user_id, user.id);
    }

    #[test]
    fn test_start_date_before_2000_rejected() {
        let user = tenant_user(Role::Tenant);
        let report = Tenant::new(&user, terms("15000", (1999, 1, 1), None)).unwrap_err();
        assert_eq!(report.messages(), vec!["Start date cannot be before year 2000"]);
        assert!(Tenant::new(&user, terms("15000", (2000, 1, 1), None)).is_ok());
    }

    #[test]
    fn test_end_date_must_follow_start() {
        let user = tenant_user(Role::Tenant);
        let report = Tenant::new(&user, terms("15000", (2024, 4, 1), Some((2024, 4, 1)))).unwrap_err();
        assert_eq!(report.messages(), vec!["End date must be after start date"]);
    }

    #[test]
    fn test_rent_must_be_positive() {
        let user = tenant_user(Role::Tenant);
        assert!(Tenant::new(&user, terms("0", (2024, 4, 1), None)).unwrap_err().has_field("rent_amount"));
        assert!(Tenant::new(&user, terms("-10", (2024, 4, 1), None)).is_err());
        assert!(Tenant::new(&user, terms("0.01", (2024, 4, 1), None)).is_ok());
    }

    #[test]
    fn test_user_must_be_tenant_role() {
        let owner = tenant_user(Role::Owner);
        let report = Tenant::new(&owner, terms("100", (2024, 4, 1), None)).unwrap_err();
        assert!(report.has_field("user"));
    }
}
