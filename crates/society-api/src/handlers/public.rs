//! Landing page, login and logout

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Form,
};
use serde_json::json;
use tracing::info;

use society_core::authorization::home_path;
use society_security::session::{clear_session_cookie, session_cookie};
use society_shared::utils::mask_email;

use crate::error::PageError;
use crate::extract::Session;
use crate::forms::LoginForm;
use crate::notice::{notice_cookie, ErrorNotice, Notice};
use crate::response::{redirect_with, render_page, see_other, see_other_with_cookies};
use crate::state::AppState;

/// GET / - signed-in users go straight to their dashboard
pub async fn index(
    State(state): State<AppState>,
    Session(user): Session,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    if let Some(user) = user {
        return Ok(see_other(home_path(user.role)));
    }
    render_page(&state.views, "index", &headers, None, json!({}))
}

/// GET /login/
pub async fn login_page(
    State(state): State<AppState>,
    Session(user): Session,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    if user.is_some() {
        return Ok(see_other("/"));
    }
    render_page(&state.views, "login", &headers, None, json!({}))
}

/// POST /login/ - accepts an e-mail address or a username
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let (identifier, password) = match form.credentials() {
        Ok(credentials) => credentials,
        Err(e) => return redirect_with("/login/", e.notice("")),
    };

    match state.auth.login(&identifier, &password).await {
        Ok(login) => {
            info!("User {} signed in as {}", mask_email(&login.user.email), login.role().as_str());
            let welcome = Notice::success(format!("Welcome back, {}!", login.user.first_name));
            let mut cookies = vec![session_cookie(
                &login.token,
                state.auth.session_expiry(),
                state.secure_cookie,
            )];
            cookies.extend(notice_cookie(&[welcome]));
            see_other_with_cookies(home_path(login.role()), cookies)
        }
        Err(e) => redirect_with("/login/", e.notice("An unexpected error occurred during login.")),
    }
}

/// POST /logout/ (GET is accepted too)
pub async fn logout() -> impl IntoResponse {
    let mut cookies = vec![clear_session_cookie()];
    cookies.extend(notice_cookie(&[Notice::success("You have been logged out successfully.")]));
    see_other_with_cookies("/", cookies)
}
