use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use yk_auth_types::cookie::SessionTokens;
use yk_auth_types::session::RequestSession;
use yk_auth_types::token::access_token_needs_refresh;

use crate::domain::repository::{DispatchThrottle, SessionSource};
use crate::domain::types::{DispatchKey, MetadataPatch, ProviderSession};
use crate::error::PortalError;

// ── SignIn (password) ────────────────────────────────────────────────────────

pub struct SignInInput {
    pub email: String,
    pub password: String,
}

pub struct SignInUseCase<S: SessionSource> {
    pub sessions: S,
}

impl<S: SessionSource> SignInUseCase<S> {
    pub async fn execute(&self, input: SignInInput) -> Result<ProviderSession, PortalError> {
        self.sessions
            .sign_in_with_password(&input.email, &input.password)
            .await
    }
}

// ── SendOneTimeCode (explicit resend) ────────────────────────────────────────

/// Public resend. Needs no session, so the cooldown is keyed by address.
pub struct SendOneTimeCodeUseCase<S: SessionSource, T: DispatchThrottle> {
    pub sessions: S,
    pub throttle: T,
}

impl<S: SessionSource, T: DispatchThrottle> SendOneTimeCodeUseCase<S, T> {
    pub async fn execute(&self, email: &str) -> Result<(), PortalError> {
        match self.throttle.try_acquire(&DispatchKey::email(email)).await {
            Ok(true) => {}
            Ok(false) => return Err(PortalError::OtpDispatchThrottled),
            Err(e) => {
                warn!(error = ?e, "dispatch throttle unavailable, sending anyway");
            }
        }
        self.sessions.send_one_time_code(email).await
    }
}

// ── VerifyOneTimeCode ────────────────────────────────────────────────────────

pub struct VerifyOneTimeCodeInput {
    pub email: String,
    pub token: String,
    pub now: DateTime<Utc>,
}

pub struct VerifyOneTimeCodeUseCase<S: SessionSource> {
    pub sessions: S,
}

impl<S: SessionSource> VerifyOneTimeCodeUseCase<S> {
    /// Exchange the code, then record the verification on the new session.
    /// The session is only returned once the verification is recorded.
    pub async fn execute(
        &self,
        input: VerifyOneTimeCodeInput,
    ) -> Result<ProviderSession, PortalError> {
        let session = self
            .sessions
            .verify_one_time_code(&input.email, &input.token)
            .await?;

        let request_session = RequestSession::from_tokens(&session.tokens);
        self.sessions
            .update_metadata(&request_session, MetadataPatch::Verified { at: input.now })
            .await?;

        Ok(session)
    }
}

// ── SignOut ──────────────────────────────────────────────────────────────────

pub struct SignOutUseCase<S: SessionSource> {
    pub sessions: S,
}

impl<S: SessionSource> SignOutUseCase<S> {
    /// Unverify, then revoke. Both are best effort; the caller clears the
    /// cookies whatever happens here.
    pub async fn execute(&self, session: &RequestSession) {
        if session.is_anonymous() {
            return;
        }
        if let Err(e) = self
            .sessions
            .update_metadata(session, MetadataPatch::Unverified)
            .await
        {
            warn!(error = ?e, "failed to clear OTP verification on sign-out");
        }
        if let Err(e) = self.sessions.terminate_session(session).await {
            warn!(error = ?e, "failed to terminate provider session");
        }
    }
}

// ── SetOtpVerification (PATCH /api/users/{id}/otpVerify) ─────────────────────

pub struct SetOtpVerificationInput {
    pub user_id: Uuid,
    pub verified: bool,
}

pub struct SetOtpVerificationUseCase<S: SessionSource> {
    pub sessions: S,
}

impl<S: SessionSource> SetOtpVerificationUseCase<S> {
    pub async fn execute(
        &self,
        session: &RequestSession,
        input: SetOtpVerificationInput,
    ) -> Result<(), PortalError> {
        let identity = self
            .sessions
            .current_identity(session)
            .await?
            .ok_or(PortalError::Unauthorized)?;
        if identity.id != input.user_id {
            return Err(PortalError::Forbidden);
        }
        if input.verified {
            return Err(PortalError::VerificationRequiresCode);
        }
        self.sessions
            .update_metadata(session, MetadataPatch::Unverified)
            .await
    }
}

// ── RefreshSession ───────────────────────────────────────────────────────────

/// What to do with the token pair a request carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRefresh {
    /// No refresh token, or the access token is still good.
    Current,
    /// The provider issued a new pair; it replaces the cookies.
    Refreshed(SessionTokens),
    /// The provider refused the refresh token; the session is over.
    Rejected,
}

/// Spends the refresh token once the access token has expired, or is about to.
pub struct RefreshSessionUseCase<S: SessionSource> {
    pub sessions: S,
}

impl<S: SessionSource> RefreshSessionUseCase<S> {
    pub async fn execute(
        &self,
        session: &RequestSession,
        now: DateTime<Utc>,
    ) -> Result<SessionRefresh, PortalError> {
        let Some(refresh_token) = session.refresh_token.as_deref() else {
            return Ok(SessionRefresh::Current);
        };
        if let Some(access_token) = session.access_token.as_deref() {
            if !access_token_needs_refresh(access_token, now.timestamp()) {
                return Ok(SessionRefresh::Current);
            }
        }

        match self.sessions.refresh_session(refresh_token).await {
            Ok(fresh) => {
                info!(user_id = %fresh.user_id, "session refreshed");
                Ok(SessionRefresh::Refreshed(fresh.tokens))
            }
            Err(PortalError::Unauthorized) => {
                debug!("refresh token rejected, session ended");
                Ok(SessionRefresh::Rejected)
            }
            Err(e) => Err(e),
        }
    }
}

// ── ExchangeAuthorizationCode (auth callback) ────────────────────────────────

pub struct ExchangeAuthorizationCodeUseCase<S: SessionSource> {
    pub sessions: S,
}

impl<S: SessionSource> ExchangeAuthorizationCodeUseCase<S> {
    pub async fn execute(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<ProviderSession, PortalError> {
        self.sessions
            .exchange_authorization_code(code, code_verifier)
            .await
    }
}
