use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use tracing::warn;

use yk_auth_types::cookie::{YK_ACCESS_TOKEN, clear_session_cookies, set_session_cookies};
use yk_auth_types::session::RequestSession;

use crate::domain::routes::is_session_exempt;
use crate::state::AppState;
use crate::usecase::session::{RefreshSessionUseCase, SessionRefresh};

/// Renews an expired access token before the route guard and the handlers
/// run. Mounted outside the guard with `axum::middleware::from_fn_with_state`.
///
/// The rotated pair is stored in the request extensions, where the
/// [`RequestSession`] extractor finds it, and written back as cookies.
pub async fn session_refresh(
    State(state): State<AppState>,
    session: RequestSession,
    mut request: Request,
    next: Next,
) -> Response {
    if is_session_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    let usecase = RefreshSessionUseCase {
        sessions: state.session_source(),
    };
    let jar = match usecase.execute(&session, Utc::now()).await {
        Ok(SessionRefresh::Current) => return next.run(request).await,
        Ok(SessionRefresh::Refreshed(tokens)) => {
            request
                .extensions_mut()
                .insert(RequestSession::from_tokens(&tokens));
            set_session_cookies(CookieJar::new(), tokens, state.cookie_domain.clone())
        }
        Ok(SessionRefresh::Rejected) => {
            request.extensions_mut().insert(RequestSession::anonymous());
            clear_session_cookies(CookieJar::new(), state.cookie_domain.clone())
        }
        Err(e) => {
            warn!(error = ?e, "session refresh failed, keeping request cookies");
            return next.run(request).await;
        }
    };

    let response = next.run(request).await;
    if sets_session_cookies(&response) {
        return response;
    }
    (jar, response).into_response()
}

/// Sign-in, code verification and logout write the session cookies
/// themselves; theirs win over the refreshed pair.
fn sets_session_cookies(response: &Response) -> bool {
    let prefix = format!("{YK_ACCESS_TOKEN}=");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&prefix))
}
