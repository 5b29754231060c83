use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Portal service error variants.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("profile not found")]
    ProfileNotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid one-time code")]
    InvalidOneTimeCode,
    #[error("one-time code could not be sent")]
    OtpDispatchFailed,
    #[error("a one-time code was sent recently, try again shortly")]
    OtpDispatchThrottled,
    #[error("verification requires a one-time code")]
    VerificationRequiresCode,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl PortalError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidOneTimeCode => "INVALID_ONE_TIME_CODE",
            Self::OtpDispatchFailed => "OTP_DISPATCH_FAILED",
            Self::OtpDispatchThrottled => "OTP_DISPATCH_THROTTLED",
            Self::VerificationRequiresCode => "VERIFICATION_REQUIRES_CODE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::ProfileNotFound => StatusCode::NOT_FOUND,
            Self::InvalidCredentials
            | Self::InvalidOneTimeCode
            | Self::OtpDispatchFailed
            | Self::VerificationRequiresCode => StatusCode::BAD_REQUEST,
            Self::OtpDispatchThrottled => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // TraceLayer records every status; only 500s need the error chain.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
