//! HTTP handlers, grouped by the role allowed to call them

pub mod admin;
pub mod health;
pub mod owner;
pub mod public;
pub mod tenant;

use axum::response::Response;
use uuid::Uuid;

use society_core::error::DomainError;
use society_shared::types::parse_id;

use crate::notice::{ErrorNotice, Notice};
use crate::response::redirect_with;

/// Ids in the path that are not UUIDs name no record.
fn path_id(raw: &str, not_found: &str) -> Result<Uuid, DomainError> {
    parse_id(raw).ok_or_else(|| DomainError::NotFound(not_found.to_string()))
}

/// Redirects to `location` with a success notice built from the result, or
/// the error notice.
fn finish<T>(
    location: &str,
    result: Result<T, DomainError>,
    success: impl FnOnce(T) -> String,
    generic: &str,
) -> Response {
    match result {
        Ok(value) => redirect_with(location, Notice::success(success(value))),
        Err(e) => redirect_with(location, e.notice(generic)),
    }
}

fn activation(active: bool) -> &'static str {
    if active {
        "activated"
    } else {
        "deactivated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};

    #[test]
    fn test_path_id() {
        let id = Uuid::new_v4();
        assert_eq!(path_id(&id.to_string(), "Bill not found.").unwrap(), id);
        assert_eq!(path_id("42", "Bill not found.").unwrap_err().to_string(), "Bill not found.");
    }

    #[test]
    fn test_finish_redirects_either_way() {
        let ok = finish("/admin/bills/", Ok::<_, DomainError>(()), |_| "done".into(), "g");
        assert_eq!(ok.status(), StatusCode::SEE_OTHER);
        assert_eq!(ok.headers()[header::LOCATION], "/admin/bills/");

        let err = finish::<()>("/admin/bills/", Err(DomainError::InternalError("x".into())), |_| "done".into(), "g");
        assert_eq!(err.status(), StatusCode::SEE_OTHER);
        assert!(err.headers().contains_key(header::SET_COOKIE));
    }
}
