//! Local pre-check of provider-issued access tokens.
//!
//! The session provider signs its access tokens with the project JWT secret
//! (HS256, audience `authenticated`). Checking signature and expiry locally lets
//! the portal reject stale or forged cookies without a provider round-trip. A
//! token that passes is still resolved at the provider, which owns the current
//! user metadata.
//!
//! [`access_token_needs_refresh`] reads only the `exp` claim and needs no
//! secret. It decides when the refresh token should be spent.

use jsonwebtoken::dangerous::insecure_decode;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(test)]
use serde::Serialize;
use uuid::Uuid;

/// Audience the provider puts on tokens of signed-in users.
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// Access tokens this close to `exp` are refreshed ahead of time.
pub const REFRESH_MARGIN_SECS: i64 = 10;

/// Errors returned by [`validate_access_token`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// Subset of the provider's JWT claims the portal reads.
#[derive(Debug, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub struct AccessTokenClaims {
    /// User ID (UUID string).
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
    pub aud: String,
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: i64,
}

/// Validate an access-token cookie value.
///
/// Validation: HS256, `exp` checked with the default 60 s leeway, `aud` must be
/// `authenticated`, required claims `exp` + `sub`, and `sub` must be a UUID.
pub fn validate_access_token(token: &str, secret: &str) -> Result<(), TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_audience(&[AUTHENTICATED_AUDIENCE]);
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<AccessTokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    data.claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| TokenError::Malformed)?;
    Ok(())
}

/// Whether an access token is expired, about to expire, or unreadable.
///
/// The signature is not checked: a forged token that claims a late `exp` is
/// still rejected by [`validate_access_token`] or the provider.
pub fn access_token_needs_refresh(token: &str, now_secs: i64) -> bool {
    match insecure_decode::<ExpiryClaim>(token) {
        Ok(data) => data.claims.exp - REFRESH_MARGIN_SECS <= now_secs,
        Err(_) => true,
    }
}
