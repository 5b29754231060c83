//! Cookie builders for the provider session tokens.
//!
//! The portal stores the provider's access and refresh tokens in its own
//! first-party cookies. Both are scoped to `/`: the route guard needs the access
//! token on every page, and any request may have to spend the refresh token once
//! the access token has expired.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the provider access token.
pub const YK_ACCESS_TOKEN: &str = "yk-access-token";

/// Cookie name for the provider refresh token.
pub const YK_REFRESH_TOKEN: &str = "yk-refresh-token";

/// Cookie name for the PKCE code verifier written by the browser before it
/// leaves for the provider. Read once by the auth callback.
pub const YK_CODE_VERIFIER: &str = "yk-code-verifier";

/// Cookie Max-Age for both tokens in seconds (7 days).
pub const SESSION_COOKIE_MAX_AGE: i64 = 604800;

/// Access and refresh token pair issued by the session provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

fn session_cookie(name: &'static str, value: String, domain: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .domain(domain)
        .max_age(max_age)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Store a freshly issued session in the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use yk_auth_types::cookie::{set_session_cookies, SessionTokens, YK_ACCESS_TOKEN, YK_REFRESH_TOKEN};
///
/// let tokens = SessionTokens {
///     access_token: "access".to_string(),
///     refresh_token: "refresh".to_string(),
/// };
/// let jar = set_session_cookies(CookieJar::new(), tokens, "example.com".to_string());
/// let access = jar.get(YK_ACCESS_TOKEN).unwrap();
/// assert_eq!(access.value(), "access");
/// assert_eq!(access.path(), Some("/"));
/// assert_eq!(access.domain(), Some("example.com"));
/// assert_eq!(access.max_age(), Some(time::Duration::seconds(604800)));
/// assert!(access.http_only().unwrap_or(false));
/// assert!(access.secure().unwrap_or(false));
/// assert_eq!(jar.get(YK_REFRESH_TOKEN).unwrap().value(), "refresh");
/// ```
pub fn set_session_cookies(jar: CookieJar, tokens: SessionTokens, domain: String) -> CookieJar {
    let max_age = Duration::seconds(SESSION_COOKIE_MAX_AGE);
    let access = session_cookie(YK_ACCESS_TOKEN, tokens.access_token, domain.clone(), max_age);
    let refresh = session_cookie(YK_REFRESH_TOKEN, tokens.refresh_token, domain, max_age);
    jar.add(access).add(refresh)
}

/// Clear both session cookies by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use yk_auth_types::cookie::{clear_session_cookies, YK_ACCESS_TOKEN, YK_REFRESH_TOKEN};
///
/// let jar = clear_session_cookies(CookieJar::new(), "example.com".to_string());
/// assert_eq!(jar.get(YK_ACCESS_TOKEN).unwrap().max_age(), Some(time::Duration::ZERO));
/// assert_eq!(jar.get(YK_REFRESH_TOKEN).unwrap().max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookies(jar: CookieJar, domain: String) -> CookieJar {
    let access = session_cookie(YK_ACCESS_TOKEN, String::new(), domain.clone(), Duration::ZERO);
    let refresh = session_cookie(YK_REFRESH_TOKEN, String::new(), domain, Duration::ZERO);
    jar.add(access).add(refresh)
}
