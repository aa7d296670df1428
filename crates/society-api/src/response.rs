//! Redirects and rendered pages

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde_json::{Map, Value};

use society_core::CurrentUser;

use crate::error::PageError;
use crate::notice::{clear_notice_cookie, notice_cookie, read_notices, Notice};
use crate::views::Views;

/// 303 to `location`, setting each cookie in `cookies`.
pub fn see_other_with_cookies(location: &str, cookies: Vec<String>) -> Response {
    let mut headers = vec![(header::LOCATION, location.to_string())];
    headers.extend(cookies.into_iter().map(|c| (header::SET_COOKIE, c)));
    (StatusCode::SEE_OTHER, AppendHeaders(headers)).into_response()
}

pub fn see_other(location: &str) -> Response {
    see_other_with_cookies(location, Vec::new())
}

/// Redirect carrying one notice to the next page.
pub fn redirect_with(location: &str, notice: Notice) -> Response {
    see_other_with_cookies(location, notice_cookie(&[notice]).into_iter().collect())
}

/// Renders `template` with `data` plus the signed-in user and any pending
/// notices, which are cleared once shown.
pub fn render_page(
    views: &Views,
    template: &str,
    headers: &HeaderMap,
    user: Option<&CurrentUser>,
    data: Value,
) -> Result<Response, PageError> {
    let notices = read_notices(headers);

    let mut context = match data {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    context.insert("current_user".to_string(), serde_json::to_value(user).unwrap_or(Value::Null));
    context.insert("notices".to_string(), serde_json::to_value(&notices).unwrap_or(Value::Null));

    let html = views.render(template, &Value::Object(context))?;
    if notices.is_empty() {
        Ok(Html(html).into_response())
    } else {
        Ok((AppendHeaders([(header::SET_COOKIE, clear_notice_cookie())]), Html(html)).into_response())
    }
}
