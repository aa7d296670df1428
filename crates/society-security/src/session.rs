//! Session cookie helpers

use society_shared::constants::SESSION_COOKIE;

/// Finds a cookie value in a raw `Cookie` header.
pub fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .map(|c| c.trim())
        .find_map(|c| c.strip_prefix(name).and_then(|rest| rest.strip_prefix('=')))
}

pub fn session_cookie(token: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value() {
        let header = "theme=dark; session_token=abc.def.ghi; notice=xyz";
        assert_eq!(cookie_value(header, "session_token"), Some("abc.def.ghi"));
        assert_eq!(cookie_value(header, "notice"), Some("xyz"));
        assert_eq!(cookie_value(header, "missing"), None);
        assert_eq!(cookie_value("session_token_old=1", "session_token"), None);
    }

    #[test]
    fn test_session_cookie_flags() {
        let cookie = session_cookie("tok", 60, true);
        assert!(cookie.starts_with("session_token=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.ends_with("; Secure"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
