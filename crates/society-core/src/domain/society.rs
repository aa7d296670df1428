//! Society domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{ValidationReport, SOCIETY_NAME_REGEX};
use society_shared::constants::{MAX_SOCIETY_NAME_LENGTH, MIN_ADDRESS_LENGTH, MIN_SOCIETY_NAME_LENGTH};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Society {
    pub id: Uuid,

    #[validate(
        length(
            min = MIN_SOCIETY_NAME_LENGTH,
            max = MAX_SOCIETY_NAME_LENGTH,
            message = "Society name must be at least 3 characters long (at most 200)"
        ),
        regex(
            path = *SOCIETY_NAME_REGEX,
            message = "Society name can only contain letters, numbers, spaces, hyphens, commas and dots"
        )
    )]
    pub name: String,

    #[validate(length(min = MIN_ADDRESS_LENGTH, message = "Please provide a complete address (minimum 10 characters)"))]
    pub address: String,

    pub created_at: DateTime<Utc>,
}

/// Society row with the number of flats it contains.
#[derive(Debug, Clone, Serialize)]
pub struct SocietySummary {
    #[serde(flatten)]
    pub society: Society,
    pub flat_count: i64,
}

impl Society {
    pub fn new(name: String, address: String) -> Result<Self, ValidationReport> {
        let society = Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            address: address.trim().to_string(),
            created_at: Utc::now(),
        };
        society.validate()?;
        Ok(society)
    }

    pub fn rename(&mut self, name: String, address: String) -> Result<(), ValidationReport> {
        self.name = name.trim().to_string();
        self.address = address.trim().to_string();
        self.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_society_trims_input() {
        let society = Society::new("  Green Meadows ".into(), "  12 Park Street, Pune ".into()).unwrap();
        assert_eq!(society.name, "Green Meadows");
        assert_eq!(society.address, "12 Park Street, Pune");
    }

    #[test]
    fn test_short_name_rejected_after_trim() {
        let report = Society::new("  ab  ".into(), "12 Park Street, Pune".into()).unwrap_err();
        assert!(report.has_field("name"));
    }

    #[test]
    fn test_long_name_rejected() {
        assert!(Society::new("a".repeat(200), "12 Park Street, Pune".into()).is_ok());
        let report = Society::new("a".repeat(201), "12 Park Street, Pune".into()).unwrap_err();
        assert!(report.has_field("name"));
    }

    #[test]
    fn test_name_charset() {
        let report = Society::new("Sunrise @ Heights".into(), "12 Park Street, Pune".into()).unwrap_err();
        assert_eq!(
            report.messages(),
            vec!["Society name can only contain letters, numbers, spaces, hyphens, commas and dots"]
        );
        assert!(Society::new("Sunrise Co-op, Phase 2.".into(), "12 Park Street, Pune".into()).is_ok());
    }

    #[test]
    fn test_address_minimum_length() {
        let report = Society::new("Green Meadows".into(), "   Pune   ".into()).unwrap_err();
        assert!(report.has_field("address"));
    }

    #[test]
    fn test_rename_validates() {
        let mut society = Society::new("Green Meadows".into(), "12 Park Street, Pune".into()).unwrap();
        assert!(society.rename("G!".into(), "12 Park Street, Pune".into()).is_err());
        assert!(society.rename("Blue Ridge".into(), "45 Hill Road, Nashik".into()).is_ok());
        assert_eq!(society.name, "Blue Ridge");
    }
}
