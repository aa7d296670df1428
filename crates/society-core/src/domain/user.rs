// ============================================================================
// Society Core - User Entity
// File: crates/society-core/src/domain/user.rs
// Description: Login account for administrators, owners and tenants
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validation::{rule_error, ValidationReport, PHONE_REGEX};
use society_shared::constants::MAX_EMAIL_LENGTH;

/// Account role. Every gated handler requires exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Owner,
    Tenant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Owner => "OWNER",
            Role::Tenant => "TENANT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "OWNER" => Some(Role::Owner),
            "TENANT" => Some(Role::Tenant),
            _ => None,
        }
    }

    /// Label used in "Access denied. X privileges required."
    pub fn privilege_label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Owner => "Owner",
            Role::Tenant => "Tenant",
        }
    }

    pub fn requires_full_name(&self) -> bool {
        matches!(self, Role::Owner | Role::Tenant)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Tenant
    }
}

/// Lightweight owner/contact projection used by list pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl UserSummary {
    /// Name falls back to the e-mail address when both parts are blank.
    pub fn new(id: Uuid, first_name: &str, last_name: &str, email: String, phone: Option<String>) -> Self {
        let full_name = format!("{} {}", first_name, last_name).trim().to_string();
        Self {
            id,
            full_name: if full_name.is_empty() { email.clone() } else { full_name },
            email,
            phone,
        }
    }
}

/// Fields an administrator or owner submits when creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub password: String,
}

/// Profile fields editable after creation.
#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_names_for_role", skip_on_field_errors = false))]
pub struct User {
    pub id: Uuid,

    #[validate(length(min = 1, max = 150, message = "Username is required (at most 150 characters)"))]
    pub username: String,

    #[validate(
        email(message = "Enter a valid email address."),
        length(max = MAX_EMAIL_LENGTH, message = "Email address must be at most 254 characters.")
    )]
    pub email: String,

    #[validate(length(max = 150, message = "First name is too long"))]
    pub first_name: String,

    #[validate(length(max = 150, message = "Last name is too long"))]
    pub last_name: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Enter a valid phone number (9-15 digits)"))]
    pub phone: Option<String>,

    pub role: Role,
    pub is_active: bool,
    pub is_superuser: bool,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

fn validate_names_for_role(user: &User) -> Result<(), ValidationError> {
    if user.role.requires_full_name() && (user.first_name.is_empty() || user.last_name.is_empty()) {
        return Err(rule_error(
            "full_name_required",
            "First name and last name are required for Owners and Tenants",
        ));
    }
    Ok(())
}

impl User {
    /// Builds an active account with an already-hashed password.
    pub fn new(account: NewAccount, role: Role, password_hash: String) -> Result<Self, ValidationReport> {
        let mut user = Self {
            id: Uuid::new_v4(),
            username: account.username,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            phone: account.phone,
            role,
            is_active: true,
            is_superuser: false,
            password_hash,
            date_joined: Utc::now(),
            last_login: None,
        };
        user.prepare()?;
        Ok(user)
    }

    pub fn new_superuser(account: NewAccount, password_hash: String) -> Result<Self, ValidationReport> {
        let mut user = Self::new(account, Role::Admin, password_hash)?;
        user.is_superuser = true;
        user.prepare()?;
        Ok(user)
    }

    pub fn apply_update(&mut self, update: AccountUpdate) -> Result<(), ValidationReport> {
        self.email = update.email;
        self.username = update.username;
        self.first_name = update.first_name;
        self.last_name = update.last_name;
        self.phone = update.phone;
        self.prepare()
    }

    /// Normalises stored fields and runs every rule. Call before each write.
    pub fn prepare(&mut self) -> Result<(), ValidationReport> {
        self.normalize();
        self.validate().map_err(ValidationReport::from)
    }

    fn normalize(&mut self) {
        self.email = self.email.trim().to_lowercase();
        self.username = self.username.trim().to_string();
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.phone = self
            .phone
            .take()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        if self.is_superuser {
            self.role = Role::Admin;
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Full name, or the email address when no name is on record.
    pub fn display_name(&self) -> String {
        let name = self.full_name();
        if name.is_empty() {
            self.email.clone()
        } else {
            name
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary::new(self.id, &self.first_name, &self.last_name, self.email.clone(), self.phone.clone())
    }

    pub fn toggle_active(&mut self) -> bool {
        self.is_active = !self.is_active;
        self.is_active
    }

    pub fn record_login(&mut self) {
        self.last_login = Some(Utc::now());
    }
}
