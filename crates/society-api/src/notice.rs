//! One-shot notices carried across a redirect in the `notice` cookie

use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use society_core::error::DomainError;
use society_security::session::cookie_value;
use society_shared::constants::NOTICE_COOKIE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Turns a failed operation into the notice shown to the user.
pub trait ErrorNotice {
    /// `generic` replaces the details of unexpected failures, which are logged instead.
    fn notice(&self, generic: &str) -> Notice;
}

impl ErrorNotice for DomainError {
    fn notice(&self, generic: &str) -> Notice {
        if self.is_unexpected() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        Notice::error(self.user_message(generic))
    }
}

/// `Set-Cookie` value carrying `notices` to the next page.
pub fn notice_cookie(notices: &[Notice]) -> Option<String> {
    if notices.is_empty() {
        return None;
    }
    let json = serde_json::to_vec(notices).ok()?;
    Some(format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=60",
        NOTICE_COOKIE,
        URL_SAFE_NO_PAD.encode(json)
    ))
}

pub fn clear_notice_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", NOTICE_COOKIE)
}

/// Notices pending for this request; a damaged cookie yields none.
pub fn read_notices(headers: &HeaderMap) -> Vec<Notice> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookies| cookie_value(cookies, NOTICE_COOKIE))
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| URL_SAFE_NO_PAD.decode(raw).ok())
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}
