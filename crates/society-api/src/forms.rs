//! Submitted forms: presence checks and coercion into service commands
//!
//! Every field arrives as optional text. Blank means missing.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use society_core::domain::{AccountUpdate, BillStatus, BillTerms, LeaseTerms, Month, NewAccount};
use society_core::error::DomainError;
use society_core::services::{FlatAssignment, NewTenant, TenantUpdate};
use society_shared::types::parse_id;
use society_shared::utils::non_blank;

fn field(value: &Option<String>) -> Option<String> {
    non_blank(value.as_deref())
}

fn require(value: &Option<String>, message: &str) -> Result<String, DomainError> {
    field(value).ok_or_else(|| DomainError::MissingField(message.to_string()))
}

fn id(value: &str, message: &str) -> Result<Uuid, DomainError> {
    parse_id(value).ok_or_else(|| DomainError::MalformedInput(message.to_string()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    /// E-mail address or username.
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginForm {
    pub fn credentials(&self) -> Result<(String, String), DomainError> {
        const MISSING: &str = "Please provide both email/username and password.";
        Ok((require(&self.email, MISSING)?, require(&self.password, MISSING)?))
    }
}

/// Create and update forms for owner accounts.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OwnerForm {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

impl OwnerForm {
    pub fn into_new_account(self) -> Result<NewAccount, DomainError> {
        const MISSING: &str = "All fields (Email, Username, Name, Password) are required.";
        Ok(NewAccount {
            email: require(&self.email, MISSING)?,
            username: require(&self.username, MISSING)?,
            first_name: require(&self.first_name, MISSING)?,
            last_name: require(&self.last_name, MISSING)?,
            phone: field(&self.phone),
            password: require(&self.password, MISSING)?,
        })
    }

    /// Profile changes plus the optional replacement password.
    pub fn into_update(self) -> Result<(AccountUpdate, Option<String>), DomainError> {
        const MISSING: &str = "Name, Email and Username cannot be empty.";
        let update = AccountUpdate {
            first_name: require(&self.first_name, MISSING)?,
            last_name: require(&self.last_name, MISSING)?,
            email: require(&self.email, MISSING)?,
            username: require(&self.username, MISSING)?,
            phone: field(&self.phone),
        };
        Ok((update, field(&self.password)))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SocietyForm {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl SocietyForm {
    pub fn into_parts(self) -> Result<(String, String), DomainError> {
        const MISSING: &str = "Society Name and Address are required.";
        Ok((require(&self.name, MISSING)?, require(&self.address, MISSING)?))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FlatForm {
    pub society: Option<String>,
    pub flat_number: Option<String>,
    pub owner: Option<String>,
}

impl FlatForm {
    pub fn into_assignment(self) -> Result<FlatAssignment, DomainError> {
        const MISSING: &str = "Society and Flat Number are required.";
        let society = require(&self.society, MISSING)?;
        let flat_number = require(&self.flat_number, MISSING)?;
        let owner_id = match field(&self.owner) {
            Some(owner) => Some(id(&owner, "Invalid Owner ID.")?),
            None => None,
        };
        Ok(FlatAssignment {
            society_id: id(&society, "Invalid Society ID.")?,
            flat_number,
            owner_id,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BillForm {
    pub flat: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

impl BillForm {
    /// Status defaults to UNPAID when creating.
    pub fn into_new_terms(self) -> Result<BillTerms, DomainError> {
        self.into_terms("All fields (Flat, Month, Year, Amount) are required.", false)
    }

    /// Status is mandatory when editing.
    pub fn into_updated_terms(self) -> Result<BillTerms, DomainError> {
        self.into_terms("All fields are required.", true)
    }

    fn into_terms(self, missing: &str, status_required: bool) -> Result<BillTerms, DomainError> {
        let flat = require(&self.flat, missing)?;
        let month = require(&self.month, missing)?;
        let year = require(&self.year, missing)?;
        let amount = require(&self.amount, missing)?;
        let status = if status_required {
            Some(require(&self.status, missing)?)
        } else {
            field(&self.status)
        };

        let flat_id = id(&flat, "Invalid Flat ID.")?;
        let malformed = || DomainError::MalformedInput("Invalid format for Year or Amount.".to_string());
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let amount = Decimal::from_str(&amount).map_err(|_| malformed())?;
        let month = Month::from_str(&month)
            .ok_or_else(|| DomainError::MalformedInput(format!("Invalid month: {}.", month)))?;
        let status = match status {
            Some(s) => BillStatus::from_str(&s)
                .ok_or_else(|| DomainError::MalformedInput(format!("Invalid status: {}.", s)))?,
            None => BillStatus::default(),
        };

        Ok(BillTerms { flat_id, month, year, amount, status })
    }
}

/// Account and lease fields of the tenant forms.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TenantForm {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub flat: Option<String>,
    pub rent_amount: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

const TENANT_FIELDS_MISSING: &str = "All fields are required.";

impl TenantForm {
    pub fn into_new_tenant(self) -> Result<NewTenant, DomainError> {
        let account = NewAccount {
            email: require(&self.email, TENANT_FIELDS_MISSING)?,
            username: require(&self.username, TENANT_FIELDS_MISSING)?,
            first_name: require(&self.first_name, TENANT_FIELDS_MISSING)?,
            last_name: require(&self.last_name, TENANT_FIELDS_MISSING)?,
            phone: field(&self.phone),
            password: require(&self.password, TENANT_FIELDS_MISSING)?,
        };
        let lease = self.lease()?;
        Ok(NewTenant { account, lease })
    }

    pub fn into_update(self) -> Result<TenantUpdate, DomainError> {
        let account = AccountUpdate {
            first_name: require(&self.first_name, TENANT_FIELDS_MISSING)?,
            last_name: require(&self.last_name, TENANT_FIELDS_MISSING)?,
            email: require(&self.email, TENANT_FIELDS_MISSING)?,
            username: require(&self.username, TENANT_FIELDS_MISSING)?,
            phone: field(&self.phone),
        };
        let lease = self.lease()?;
        Ok(TenantUpdate { account, lease })
    }

    fn lease(&self) -> Result<LeaseTerms, DomainError> {
        let flat = require(&self.flat, TENANT_FIELDS_MISSING)?;
        let rent = require(&self.rent_amount, TENANT_FIELDS_MISSING)?;
        let start = require(&self.start_date, TENANT_FIELDS_MISSING)?;

        let flat_id = id(&flat, "Invalid Flat ID.")?;
        let malformed = || DomainError::MalformedInput("Invalid format for Rent or Date.".to_string());
        let rent_amount = Decimal::from_str(&rent).map_err(|_| malformed())?;
        let start_date = parse_date(&start).ok_or_else(malformed)?;
        let end_date = match field(&self.end_date) {
            Some(end) => Some(parse_date(&end).ok_or_else(malformed)?),
            None => None,
        };
        Ok(LeaseTerms { flat_id, rent_amount, start_date, end_date })
    }
}

/// `YYYY-MM-DD`, as sent by date inputs.
fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// `?status=` on the owner's bill list.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BillStatusQuery {
    pub status: Option<String>,
}

impl BillStatusQuery {
    /// Unknown values are ignored rather than matching nothing.
    pub fn status(&self) -> Option<BillStatus> {
        field(&self.status).and_then(|s| BillStatus::from_str(&s))
    }
}
