//! Session cookie extractor.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum_extra::extract::CookieJar;
use http::request::Parts;

use crate::cookie::{SessionTokens, YK_ACCESS_TOKEN, YK_REFRESH_TOKEN};

/// Session tokens carried by a request, as read from the portal cookies.
///
/// Never rejects: a request without cookies is an anonymous session, and
/// deciding what anonymous callers may do is the route guard's job.
///
/// A `RequestSession` already stored in the request extensions takes
/// precedence over the cookies. The session refresh middleware stores one
/// after rotating the tokens, so later extractors see the new pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSession {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl RequestSession {
    pub fn from_jar(jar: &CookieJar) -> Self {
        let read = |name: &str| {
            jar.get(name)
                .map(|c| c.value().to_owned())
                .filter(|v| !v.is_empty())
        };
        Self {
            access_token: read(YK_ACCESS_TOKEN),
            refresh_token: read(YK_REFRESH_TOKEN),
        }
    }

    /// Session for a token pair the provider just issued.
    pub fn from_tokens(tokens: &SessionTokens) -> Self {
        Self {
            access_token: Some(tokens.access_token.clone()),
            refresh_token: Some(tokens.refresh_token.clone()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_access_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.access_token.is_none()
    }
}

impl<S> FromRequestParts<S> for RequestSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Read the cookies synchronously and return a 'static future.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let session = match parts.extensions.get::<RequestSession>() {
            Some(session) => session.clone(),
            None => Self::from_jar(&CookieJar::from_headers(&parts.headers)),
        };
        async move { Ok(session) }
    }
}
