//! Utility functions

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let prefix: String = local.chars().take(2).collect();
        format!("{}***{}", prefix, domain)
    } else {
        "***".to_string()
    }
}

/// Trims a submitted form value, mapping blank input to `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "al***@example.com");
        assert_eq!(mask_email("a@example.com"), "a***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
        assert_eq!(mask_email("@example.com"), "***@example.com");
    }

    #[test]
    fn test_mask_email_multibyte_local_part() {
        assert_eq!(mask_email("é@example.com"), "é***@example.com");
        assert_eq!(mask_email("日本語@example.com"), "日本***@example.com");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  A-101 ")), Some("A-101".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
