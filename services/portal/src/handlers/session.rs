use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use yk_auth_types::cookie::{clear_session_cookies, set_session_cookies};
use yk_auth_types::session::RequestSession;

use crate::domain::types::ProviderSession;
use crate::error::PortalError;
use crate::state::AppState;
use crate::usecase::session::{
    SendOneTimeCodeUseCase, SetOtpVerificationInput, SetOtpVerificationUseCase, SignInInput,
    SignInUseCase, SignOutUseCase, VerifyOneTimeCodeInput, VerifyOneTimeCodeUseCase,
};

#[derive(Serialize)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub data: SessionUser,
}

fn session_response(
    jar: CookieJar,
    session: ProviderSession,
    cookie_domain: String,
) -> (CookieJar, Json<SessionResponse>) {
    let body = SessionResponse {
        data: SessionUser {
            user_id: session.user_id,
            email: session.email,
        },
    };
    (set_session_cookies(jar, session.tokens, cookie_domain), Json(body))
}

// ── POST /api/auth/login ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, PortalError> {
    let usecase = SignInUseCase {
        sessions: state.session_source(),
    };
    let session = usecase
        .execute(SignInInput {
            email: form.email,
            password: form.password,
        })
        .await?;
    Ok(session_response(jar, session, state.cookie_domain.clone()))
}

// ── POST /api/auth/login/otp/send ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendCodeForm {
    pub email: String,
}

pub async fn send_one_time_code(
    State(state): State<AppState>,
    Form(form): Form<SendCodeForm>,
) -> Result<StatusCode, PortalError> {
    let usecase = SendOneTimeCodeUseCase {
        sessions: state.session_source(),
        throttle: state.dispatch_throttle(),
    };
    usecase.execute(&form.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /api/auth/login/otp/verify ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyCodeForm {
    pub email: String,
    pub token: String,
}

pub async fn verify_one_time_code(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<VerifyCodeForm>,
) -> Result<impl IntoResponse, PortalError> {
    let usecase = VerifyOneTimeCodeUseCase {
        sessions: state.session_source(),
    };
    let session = usecase
        .execute(VerifyOneTimeCodeInput {
            email: form.email,
            token: form.token,
            now: Utc::now(),
        })
        .await?;
    Ok(session_response(jar, session, state.cookie_domain.clone()))
}

// ── POST /api/auth/logout ────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    session: RequestSession,
    jar: CookieJar,
) -> impl IntoResponse {
    let usecase = SignOutUseCase {
        sessions: state.session_source(),
    };
    usecase.execute(&session).await;
    let jar = clear_session_cookies(jar, state.cookie_domain.clone());
    (StatusCode::NO_CONTENT, jar)
}

// ── PATCH /api/users/{user_id}/otpVerify ─────────────────────────────────────

#[derive(Deserialize)]
pub struct OtpVerifyRequest {
    pub verified: bool,
}

pub async fn set_otp_verification(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    session: RequestSession,
    Json(body): Json<OtpVerifyRequest>,
) -> Result<StatusCode, PortalError> {
    let usecase = SetOtpVerificationUseCase {
        sessions: state.session_source(),
    };
    usecase
        .execute(
            &session,
            SetOtpVerificationInput {
                user_id,
                verified: body.verified,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
