// ============================================================================
// Society Core - Flat Entity
// File: crates/society-core/src/domain/flat.rs
// Description: Unit within a society, optionally assigned to an owner
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::user::{Role, User, UserSummary};
use crate::validation::{ValidationReport, Violation, FLAT_NUMBER_REGEX};
use society_shared::constants::MAX_FLAT_NUMBER_LENGTH;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Flat {
    pub id: Uuid,
    pub society_id: Uuid,

    #[validate(
        length(min = 1, max = MAX_FLAT_NUMBER_LENGTH, message = "Flat number must be between 1 and 50 characters"),
        regex(
            path = *FLAT_NUMBER_REGEX,
            message = "Flat number can only contain letters, numbers, hyphens and slashes (e.g., A-101, B/205)"
        )
    )]
    pub flat_number: String,

    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Flat joined with its society name and owner.
#[derive(Debug, Clone, Serialize)]
pub struct FlatDetail {
    #[serde(flatten)]
    pub flat: Flat,
    pub society_name: String,
    pub owner: Option<UserSummary>,
}

impl FlatDetail {
    /// "Society - A-101"
    pub fn label(&self) -> String {
        format!("{} - {}", self.society_name, self.flat.flat_number)
    }
}

impl Flat {
    pub fn new(society_id: Uuid, flat_number: String, owner: Option<&User>) -> Result<Self, ValidationReport> {
        let mut flat = Self {
            id: Uuid::new_v4(),
            society_id,
            flat_number,
            owner_id: None,
            created_at: Utc::now(),
        };
        flat.assign(society_id, flat.flat_number.clone(), owner)?;
        Ok(flat)
    }

    /// Moves the flat to `society_id`, renumbers it and sets (or clears) its owner.
    pub fn assign(
        &mut self,
        society_id: Uuid,
        flat_number: String,
        owner: Option<&User>,
    ) -> Result<(), ValidationReport> {
        self.society_id = society_id;
        self.flat_number = flat_number.trim().to_uppercase();
        self.owner_id = owner.map(|o| o.id);

        let mut report = match self.validate() {
            Ok(()) => ValidationReport::new(),
            Err(errors) => errors.into(),
        };
        if let Some(owner) = owner {
            if owner.role != Role::Owner {
                report.push(Violation::field("owner", "Selected user must have OWNER role"));
            }
        }
        report.into_result()
    }

    pub fn has_owner(&self) -> bool {
        self.owner_id.is_some()
    }

    pub fn is_owned_by(&self, user_id: &Uuid) -> bool {
        self.owner_id.as_ref() == Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::NewAccount;

    fn user(role: Role) -> User {
        User::new(
            NewAccount {
                email: "rahul@example.com".into(),
                username: "rahul".into(),
                first_name: "Rahul".into(),
                last_name: "Mehta".into(),
                phone: None,
                password: "secret".into(),
            },
            role,
            "hash".into(),
        )
        .unwrap()
    }

    #[test]
    fn test_flat_number_uppercased() {
        let flat = Flat::new(Uuid::new_v4(), "  a-101 ".into(), None).unwrap();
        assert_eq!(flat.flat_number, "A-101");
        assert!(!flat.has_owner());
    }

    #[test]
    fn test_flat_number_charset() {
        assert!(Flat::new(Uuid::new_v4(), "B/205".into(), None).is_ok());
        let report = Flat::new(Uuid::new_v4(), "A 101".into(), None).unwrap_err();
        assert!(report.has_field("flat_number"));
    }

    #[test]
    fn test_flat_number_length_cap() {
        assert!(Flat::new(Uuid::new_v4(), "A".repeat(50), None).is_ok());
        let report = Flat::new(Uuid::new_v4(), "A".repeat(51), None).unwrap_err();
        assert!(report.has_field("flat_number"));
    }

    #[test]
    fn test_owner_must_have_owner_role() {
        let owner = user(Role::Owner);
        let flat = Flat::new(Uuid::new_v4(), "C-3".into(), Some(&owner)).unwrap();
        assert!(flat.is_owned_by(&owner.id));

        let tenant = user(Role::Tenant);
        let report = Flat::new(Uuid::new_v4(), "C-3".into(), Some(&tenant)).unwrap_err();
        assert_eq!(report.messages(), vec!["Selected user must have OWNER role"]);
    }

    #[test]
    fn test_reassign_clears_owner() {
        let owner = user(Role::Owner);
        let mut flat = Flat::new(Uuid::new_v4(), "C-3".into(), Some(&owner)).unwrap();
        flat.assign(flat.society_id, "c-4".into(), None).unwrap();
        assert_eq!(flat.flat_number, "C-4");
        assert!(!flat.has_owner());
    }
}
