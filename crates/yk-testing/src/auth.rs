//! Session helpers for integration tests.
//!
//! The portal reads the session from its own cookies. `MockSession` renders those
//! cookies as a request header, and `sign_access_token` mints a provider-style
//! access token so the local pre-check can be exercised without a provider.

use axum::http::{HeaderMap, HeaderValue, header::COOKIE};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use yk_auth_types::cookie::{YK_ACCESS_TOKEN, YK_REFRESH_TOKEN};
use yk_auth_types::token::AUTHENTICATED_AUDIENCE;

/// Session tokens to send with a test request.
pub struct MockSession {
    pub access_token: String,
    pub refresh_token: String,
}

impl MockSession {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// `Cookie` header value carrying both session cookies.
    pub fn cookie_header(&self) -> HeaderValue {
        let value = format!(
            "{YK_ACCESS_TOKEN}={}; {YK_REFRESH_TOKEN}={}",
            self.access_token, self.refresh_token
        );
        HeaderValue::from_str(&value).unwrap()
    }

    /// Return headers as a browser holding this session would send them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(COOKIE, self.cookie_header());
        map
    }
}

/// HS256 access token shaped like the provider's, expiring `ttl_secs` from now.
/// A negative `ttl_secs` yields an already expired token.
pub fn sign_access_token(user_id: Uuid, email: &str, secret: &str, ttl_secs: i64) -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    let claims = serde_json::json!({
        "sub": user_id.to_string(),
        "email": email,
        "aud": AUTHENTICATED_AUDIENCE,
        "role": "authenticated",
        "exp": now + ttl_secs,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
