use axum::http::StatusCode;

/// Liveness check for `GET /healthz`.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz`. The portal holds no pools that need warming,
/// so readiness equals liveness.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
