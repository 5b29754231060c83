use std::path::Path;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use tower_http::services::{ServeDir, ServeFile};

use yk_core::health::{healthz, readyz};
use yk_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    callback::auth_callback,
    clients::list_clients,
    guard::route_guard,
    profiles::{get_me, list_profiles},
    refresh::session_refresh,
    session::{login, logout, send_one_time_code, set_otp_verification, verify_one_time_code},
};
use crate::state::AppState;

/// Portal router. Pages are served from `static_dir` (single-page app, unknown
/// paths fall back to `index.html`) behind the route guard. Session refresh
/// runs before the guard so it sees the rotated tokens.
pub fn build_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let static_dir = static_dir.as_ref();
    let pages = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Session
        .route("/api/auth/login", post(login))
        .route("/api/auth/login/otp/send", post(send_one_time_code))
        .route("/api/auth/login/otp/verify", post(verify_one_time_code))
        .route("/api/auth/logout", post(logout))
        .route("/api/users/{user_id}/otpVerify", patch(set_otp_verification))
        .route("/auth/callback", get(auth_callback))
        // Profiles and clients
        .route("/api/me", get(get_me))
        .route("/api/profiles", get(list_profiles))
        .route("/api/clients", get(list_clients))
        // Pages
        .fallback_service(pages)
        .layer(middleware::from_fn_with_state(state.clone(), route_guard))
        .layer(middleware::from_fn_with_state(state.clone(), session_refresh))
        .layer(trace_layer())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
