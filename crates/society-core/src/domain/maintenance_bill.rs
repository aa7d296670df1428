// ============================================================================
// Society Core - Maintenance Bill Entity
// File: crates/society-core/src/domain/maintenance_bill.rs
// Description: Monthly maintenance charge raised against a flat
// ============================================================================

use chrono::{DateTime, Datelike, Local, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::flat::Flat;
use super::user::UserSummary;
use crate::validation::{check_money_precision, rule_error, ValidationReport, Violation};
use society_shared::constants::MIN_BILL_YEAR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Month::January => "JANUARY",
            Month::February => "FEBRUARY",
            Month::March => "MARCH",
            Month::April => "APRIL",
            Month::May => "MAY",
            Month::June => "JUNE",
            Month::July => "JULY",
            Month::August => "AUGUST",
            Month::September => "SEPTEMBER",
            Month::October => "OCTOBER",
            Month::November => "NOVEMBER",
            Month::December => "DECEMBER",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        Self::ALL.iter().copied().find(|m| m.as_str() == upper)
    }

    /// "January"
    pub fn label(&self) -> String {
        let s = self.as_str();
        format!("{}{}", &s[..1], s[1..].to_lowercase())
    }

    /// 1-based calendar number.
    pub fn number(&self) -> u32 {
        Self::ALL.iter().position(|m| m == self).map(|i| i as u32 + 1).unwrap_or(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BillStatus {
    Paid,
    Unpaid,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Paid => "PAID",
            BillStatus::Unpaid => "UNPAID",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PAID" => Some(BillStatus::Paid),
            "UNPAID" => Some(BillStatus::Unpaid),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            BillStatus::Paid => BillStatus::Unpaid,
            BillStatus::Unpaid => BillStatus::Paid,
        }
    }
}

impl Default for BillStatus {
    fn default() -> Self {
        BillStatus::Unpaid
    }
}

/// Billing fields submitted by an administrator.
#[derive(Debug, Clone)]
pub struct BillTerms {
    pub flat_id: Uuid,
    pub month: Month,
    pub year: i32,
    pub amount: Decimal,
    pub status: BillStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MaintenanceBill {
    pub id: Uuid,
    pub flat_id: Uuid,
    pub month: Month,

    #[validate(custom(function = "validate_bill_year"))]
    pub year: i32,

    #[validate(custom(function = "validate_bill_amount"))]
    pub amount: Decimal,

    pub status: BillStatus,
    pub created_at: DateTime<Utc>,
}

/// Bill joined with flat, society and owner for list pages.
#[derive(Debug, Clone, Serialize)]
pub struct BillDetail {
    #[serde(flatten)]
    pub bill: MaintenanceBill,
    pub flat_number: String,
    pub society_name: String,
    pub owner: Option<UserSummary>,
}

/// Latest year a bill may be raised for.
pub fn max_bill_year() -> i32 {
    Local::now().year() + 1
}

fn validate_bill_year(year: i32) -> Result<(), ValidationError> {
    if year < MIN_BILL_YEAR {
        return Err(rule_error("year", "Year must be 2000 or later"));
    }
    let max = max_bill_year();
    if year > max {
        return Err(rule_error("year", format!("Year cannot be more than {}", max)));
    }
    Ok(())
}

fn validate_bill_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount < Decimal::ONE {
        return Err(rule_error("amount", "Bill amount must be at least ₹1"));
    }
    check_money_precision(amount)
}

impl MaintenanceBill {
    pub fn new(flat: &Flat, terms: BillTerms) -> Result<Self, ValidationReport> {
        let bill = Self {
            id: Uuid::new_v4(),
            flat_id: flat.id,
            month: terms.month,
            year: terms.year,
            amount: terms.amount,
            status: terms.status,
            created_at: Utc::now(),
        };
        bill.check(flat)?;
        Ok(bill)
    }

    pub fn apply_terms(&mut self, flat: &Flat, terms: BillTerms) -> Result<(), ValidationReport> {
        self.flat_id = flat.id;
        self.month = terms.month;
        self.year = terms.year;
        self.amount = terms.amount;
        self.status = terms.status;
        self.check(flat)
    }

    /// Field rules plus "the flat must have an owner".
    pub fn check(&self, flat: &Flat) -> Result<(), ValidationReport> {
        let mut report = match self.validate() {
            Ok(()) => ValidationReport::new(),
            Err(errors) => errors.into(),
        };
        if !flat.has_owner() {
            report.push(Violation::field("flat", "Cannot create bill for flat without an owner"));
        }
        report.into_result()
    }

    pub fn toggle_status(&mut self) -> BillStatus {
        self.status = self.status.toggled();
        self.status
    }

    /// "January 2025"
    pub fn period(&self) -> String {
        format!("{} {}", self.month.label(), self.year)
    }
}
