//! Validation report types and shared field rules

use std::borrow::Cow;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

pub static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("valid phone regex"));

pub static SOCIETY_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s\-,.]+$").expect("valid society name regex"));

pub static FLAT_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\-/]+$").expect("valid flat number regex"));

const MONEY_MAX_DIGITS: u32 = 10;
const MONEY_DECIMAL_PLACES: u32 = 2;

/// A single failed rule. `field` is `None` for rules spanning several fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: Option<String>,
    pub message: String,
}

impl Violation {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self { field: Some(field.to_string()), message: message.into() }
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self { field: None, message: message.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(violation: Violation) -> Self {
        Self { violations: vec![violation] }
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.violations.extend(other.violations);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field.as_deref() == Some(field))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join(", "))
    }
}

impl From<ValidationErrors> for ValidationReport {
    fn from(errors: ValidationErrors) -> Self {
        let mut violations: Vec<Violation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field));
                    if field == "__all__" {
                        Violation::general(message)
                    } else {
                        Violation::field(&field, message)
                    }
                })
            })
            .collect();
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        Self { violations }
    }
}

pub(crate) fn rule_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Decimal column rule: at most 10 digits, 2 of them after the point.
pub(crate) fn check_money_precision(value: &Decimal) -> Result<(), ValidationError> {
    let normalized = value.normalize();
    if normalized.scale() > MONEY_DECIMAL_PLACES {
        return Err(rule_error(
            "decimal_places",
            "Ensure that there are no more than 2 decimal places.",
        ));
    }
    let integer_digits = normalized.trunc().abs().to_string().trim_start_matches('0').len() as u32;
    if integer_digits > MONEY_MAX_DIGITS - MONEY_DECIMAL_PLACES {
        return Err(rule_error(
            "max_digits",
            "Ensure that there are no more than 10 digits in total.",
        ));
    }
    Ok(())
}
