use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use yk_auth_types::session::RequestSession;

use crate::domain::routes::is_guard_exempt;
use crate::domain::types::GuardDecision;
use crate::state::AppState;
use crate::usecase::guard::{GuardInput, RouteGuardUseCase};

/// Page-route gate. Mounted with `axum::middleware::from_fn_with_state`.
pub async fn route_guard(
    State(state): State<AppState>,
    session: RequestSession,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if is_guard_exempt(&path) {
        return next.run(request).await;
    }

    let usecase = RouteGuardUseCase {
        sessions: state.session_source(),
        throttle: state.dispatch_throttle(),
        routes: state.routes,
        otp_window: state.otp_window,
    };
    let decision = usecase
        .execute(GuardInput {
            path: &path,
            session: &session,
            now: Utc::now(),
        })
        .await;

    match decision {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(target) => {
            Redirect::temporary(state.routes.path_of(target)).into_response()
        }
    }
}
