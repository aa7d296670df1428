//! Common types

use uuid::Uuid;

pub type EntityId = Uuid;

/// Parses a form/path id, tolerating surrounding whitespace.
pub fn parse_id(raw: &str) -> Option<EntityId> {
    Uuid::parse_str(raw.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&format!(" {} ", id)), Some(id));
        assert_eq!(parse_id("17"), None);
        assert_eq!(parse_id(""), None);
    }
}
