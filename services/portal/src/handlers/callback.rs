use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use yk_auth_types::cookie::{YK_CODE_VERIFIER, set_session_cookies};

use crate::state::AppState;
use crate::usecase::session::ExchangeAuthorizationCodeUseCase;

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub next: Option<String>,
}

/// Where the callback sends the browser: `next` under the portal origin when it
/// is a local path, the portal root otherwise.
pub fn callback_redirect_target(site_url: &Url, next: Option<&str>) -> Url {
    let Some(next) = next else {
        return site_url.clone();
    };
    let local = next.starts_with('/') && !next.starts_with("//") && !next.starts_with("/\\");
    if !local {
        return site_url.clone();
    }
    site_url.join(next).unwrap_or_else(|_| site_url.clone())
}

// ── GET /auth/callback ───────────────────────────────────────────────────────

pub async fn auth_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> impl IntoResponse {
    let target = callback_redirect_target(&state.site_url, query.next.as_deref());
    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        return (jar, Redirect::temporary(target.as_str()));
    };

    let verifier = jar.get(YK_CODE_VERIFIER).map(|c| c.value().to_owned());
    let jar = jar.remove(Cookie::build(YK_CODE_VERIFIER).path("/"));

    let usecase = ExchangeAuthorizationCodeUseCase {
        sessions: state.session_source(),
    };
    let jar = match usecase.execute(&code, verifier.as_deref()).await {
        Ok(session) => {
            info!(user_id = %session.user_id, "authorization code exchanged");
            set_session_cookies(jar, session.tokens, state.cookie_domain.clone())
        }
        Err(e) => {
            warn!(error = ?e, "authorization code exchange failed");
            jar
        }
    };
    (jar, Redirect::temporary(target.as_str()))
}
