//! Session cookie handling
//!
//! The cookie value is the raw session token; everything the server
//! trusts about it comes from the sessions table lookup. Requests may
//! also present the token as `Authorization: Bearer` for non-browser
//! clients.

use axum::http::{header, HeaderMap};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "murmur_session";

/// Build the `Set-Cookie` value for a fresh session.
///
/// HttpOnly keeps the token away from page scripts; SameSite=Lax still
/// lets top-level navigations carry it.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the `Set-Cookie` value that clears the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// Pull the session token out of a request.
///
/// Checks the session cookie first, then falls back to a Bearer token.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            let token = pair
                .trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='));
            if let Some(token) = token {
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }

    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn cookie_format() {
        let cookie = session_cookie("tok123", 3600, false);
        assert_eq!(
            cookie,
            "murmur_session=tok123; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600"
        );

        let secure = session_cookie("tok123", 3600, true);
        assert!(secure.ends_with("; Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie(false);
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.starts_with("murmur_session=;"));
    }

    #[test]
    fn token_from_cookie_header() {
        let headers = headers_with(header::COOKIE, "theme=dark; murmur_session=tok123; lang=en");
        assert_eq!(session_token(&headers).as_deref(), Some("tok123"));
    }

    #[test]
    fn token_from_bearer_fallback() {
        let headers = headers_with(header::AUTHORIZATION, "Bearer tok456");
        assert_eq!(session_token(&headers).as_deref(), Some("tok456"));
    }

    #[test]
    fn cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("murmur_session=from-cookie"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-bearer"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn missing_and_empty_tokens() {
        assert_eq!(session_token(&HeaderMap::new()), None);

        let headers = headers_with(header::COOKIE, "murmur_session=");
        assert_eq!(session_token(&headers), None);

        let headers = headers_with(header::AUTHORIZATION, "Basic dXNlcjpwYXNz");
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn similar_cookie_names_do_not_match() {
        let headers = headers_with(header::COOKIE, "murmur_session_old=stale");
        assert_eq!(session_token(&headers), None);
    }
}
