//! Role gate applied in front of every protected handler

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Role, User};

/// Signed-in account resolved from the session cookie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: Role,
    pub email: String,
    pub first_name: String,
    pub display_name: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            display_name: user.display_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// No valid session: send to the login page.
    Login,
    /// Signed in with another role: send home with this notice.
    Denied(String),
}

pub fn authorize(session: Option<&CurrentUser>, required: Role) -> Access {
    match session {
        None => Access::Login,
        Some(user) if user.role == required => Access::Granted,
        Some(_) => Access::Denied(format!(
            "Access denied. {} privileges required.",
            required.privilege_label()
        )),
    }
}

/// Landing page for each role after login.
pub fn home_path(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin-dashboard/",
        Role::Owner => "/owner-dashboard/",
        Role::Tenant => "/tenant-dashboard/",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            role,
            email: "x@example.com".into(),
            first_name: "X".into(),
            display_name: "X Y".into(),
        }
    }

    #[test]
    fn test_unauthenticated_goes_to_login() {
        for role in [Role::Admin, Role::Owner, Role::Tenant] {
            assert_eq!(authorize(None, role), Access::Login);
        }
    }

    #[test]
    fn test_matching_role_granted() {
        for role in [Role::Admin, Role::Owner, Role::Tenant] {
            assert_eq!(authorize(Some(&session(role)), role), Access::Granted);
        }
    }

    #[test]
    fn test_wrong_role_denied_with_notice() {
        assert_eq!(
            authorize(Some(&session(Role::Tenant)), Role::Admin),
            Access::Denied("Access denied. Administrator privileges required.".into())
        );
        assert_eq!(
            authorize(Some(&session(Role::Admin)), Role::Owner),
            Access::Denied("Access denied. Owner privileges required.".into())
        );
        assert_eq!(
            authorize(Some(&session(Role::Owner)), Role::Tenant),
            Access::Denied("Access denied. Tenant privileges required.".into())
        );
    }

    #[test]
    fn test_home_paths() {
        assert_eq!(home_path(Role::Admin), "/admin-dashboard/");
        assert_eq!(home_path(Role::Owner), "/owner-dashboard/");
        assert_eq!(home_path(Role::Tenant), "/tenant-dashboard/");
    }
}
