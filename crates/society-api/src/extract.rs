//! Session and role extractors
//!
//! `AdminUser`, `OwnerUser` and `TenantUser` reject with a redirect: to
//! `/login/` without a valid session, home with a notice for another role.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
    response::Response,
};
use std::convert::Infallible;

use society_core::{authorize, Access, CurrentUser, Role};
use society_security::session::cookie_value;
use society_shared::constants::SESSION_COOKIE;

use crate::notice::Notice;
use crate::response::{redirect_with, see_other};
use crate::state::AppState;

async fn session_user(parts: &Parts, state: &AppState) -> Option<CurrentUser> {
    let token = parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookies| cookie_value(cookies, SESSION_COOKIE))
        .filter(|token| !token.is_empty())
        .map(str::to_string)?;
    state.auth.resolve_session(&token).await
}

async fn require_role(parts: &Parts, state: &AppState, role: Role) -> Result<CurrentUser, Response> {
    let user = session_user(parts, state).await;
    match (authorize(user.as_ref(), role), user) {
        (Access::Granted, Some(user)) => Ok(user),
        (Access::Denied(message), _) => Err(redirect_with("/", Notice::error(message))),
        _ => Err(see_other("/login/")),
    }
}

/// Signed-in user, if any. Never rejects.
pub struct Session(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Session(session_user(parts, state).await))
    }
}

pub struct AdminUser(pub CurrentUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Admin).await.map(AdminUser)
    }
}

pub struct OwnerUser(pub CurrentUser);

impl FromRequestParts<AppState> for OwnerUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Owner).await.map(OwnerUser)
    }
}

pub struct TenantUser(pub CurrentUser);

impl FromRequestParts<AppState> for TenantUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Tenant).await.map(TenantUser)
    }
}
