use anyhow::Context as _;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use yk_auth_types::cookie::SessionTokens;
use yk_auth_types::session::RequestSession;
use yk_auth_types::token::validate_access_token;

use crate::domain::repository::SessionSource;
use crate::domain::types::{Identity, MetadataPatch, ProviderSession, UserMetadata};
use crate::error::PortalError;
use crate::infra::supabase::{SupabaseHttp, expect_json, expect_success, rejection_message};

/// [`SessionSource`] backed by the provider's GoTrue REST API (`/auth/v1`).
#[derive(Clone)]
pub struct GoTrueSessionSource {
    pub supabase: SupabaseHttp,
    /// Project JWT secret. When set, access tokens are checked locally before
    /// asking the provider, so expired or forged cookies cost no round-trip.
    pub jwt_secret: Option<String>,
}

#[derive(Deserialize)]
struct GoTrueUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
}

impl From<GoTrueUser> for Identity {
    fn from(user: GoTrueUser) -> Self {
        Identity {
            id: user.id,
            email: user.email,
            metadata: user.user_metadata.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct GoTrueSession {
    access_token: String,
    refresh_token: String,
    user: GoTrueUser,
}

impl From<GoTrueSession> for ProviderSession {
    fn from(session: GoTrueSession) -> Self {
        ProviderSession {
            tokens: SessionTokens {
                access_token: session.access_token,
                refresh_token: session.refresh_token,
            },
            user_id: session.user.id,
            email: session.user.email,
        }
    }
}

impl GoTrueSessionSource {
    /// Token grant shared by password sign-in and the PKCE exchange.
    /// 4xx answers map to `rejected`; anything else unexpected is internal.
    async fn grant(
        &self,
        grant_type: &'static str,
        body: serde_json::Value,
        rejected: PortalError,
    ) -> Result<ProviderSession, PortalError> {
        let resp = self
            .supabase
            .request(
                Method::POST,
                &format!("auth/v1/token?grant_type={grant_type}"),
                None,
            )
            .json(&body)
            .send()
            .await
            .with_context(|| format!("GoTrue {grant_type} grant request"))?;
        if resp.status().is_client_error() {
            let reason = rejection_message(resp).await;
            debug!(grant_type, reason = %reason, "token grant rejected");
            return Err(rejected);
        }
        let session: GoTrueSession = expect_json(resp, "GoTrue token grant").await?;
        Ok(session.into())
    }
}

impl SessionSource for GoTrueSessionSource {
    async fn current_identity(
        &self,
        session: &RequestSession,
    ) -> Result<Option<Identity>, PortalError> {
        let Some(access_token) = session.access_token.as_deref() else {
            return Ok(None);
        };

        if let Some(secret) = self.jwt_secret.as_deref() {
            if let Err(e) = validate_access_token(access_token, secret) {
                debug!(reason = %e, "access token rejected locally");
                return Ok(None);
            }
        }

        let resp = self
            .supabase
            .request(Method::GET, "auth/v1/user", Some(access_token))
            .send()
            .await
            .context("GoTrue get user request")?;
        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                let reason = rejection_message(resp).await;
                debug!(reason = %reason, "provider rejected session");
                Ok(None)
            }
            _ => {
                let user: GoTrueUser = expect_json(resp, "GoTrue get user").await?;
                Ok(Some(user.into()))
            }
        }
    }

    async fn update_metadata(
        &self,
        session: &RequestSession,
        patch: MetadataPatch,
    ) -> Result<(), PortalError> {
        let access_token = session
            .access_token
            .as_deref()
            .ok_or(PortalError::Unauthorized)?;
        let resp = self
            .supabase
            .request(Method::PUT, "auth/v1/user", Some(access_token))
            .json(&json!({ "data": patch.to_metadata() }))
            .send()
            .await
            .context("GoTrue update user request")?;
        if matches!(resp.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(PortalError::Unauthorized);
        }
        expect_success(resp, "GoTrue update user").await?;
        Ok(())
    }

    async fn terminate_session(&self, session: &RequestSession) -> Result<(), PortalError> {
        let Some(access_token) = session.access_token.as_deref() else {
            return Ok(());
        };
        let resp = self
            .supabase
            .request(Method::POST, "auth/v1/logout", Some(access_token))
            .send()
            .await
            .context("GoTrue logout request")?;
        // An already revoked or expired session is the outcome we wanted.
        if matches!(
            resp.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
        ) {
            return Ok(());
        }
        expect_success(resp, "GoTrue logout").await?;
        Ok(())
    }

    async fn send_one_time_code(&self, email: &str) -> Result<(), PortalError> {
        let resp = self
            .supabase
            .request(Method::POST, "auth/v1/otp", None)
            .json(&json!({ "email": email, "create_user": false }))
            .send()
            .await
            .context("GoTrue otp request")?;
        if resp.status().is_client_error() {
            let reason = rejection_message(resp).await;
            debug!(reason = %reason, "one-time code dispatch rejected");
            return Err(PortalError::OtpDispatchFailed);
        }
        expect_success(resp, "GoTrue otp").await?;
        Ok(())
    }

    async fn verify_one_time_code(
        &self,
        email: &str,
        token: &str,
    ) -> Result<ProviderSession, PortalError> {
        let resp = self
            .supabase
            .request(Method::POST, "auth/v1/verify", None)
            .json(&json!({ "type": "email", "email": email, "token": token }))
            .send()
            .await
            .context("GoTrue verify request")?;
        if resp.status().is_client_error() {
            let reason = rejection_message(resp).await;
            debug!(reason = %reason, "one-time code rejected");
            return Err(PortalError::InvalidOneTimeCode);
        }
        let session: GoTrueSession = expect_json(resp, "GoTrue verify").await?;
        Ok(session.into())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, PortalError> {
        self.grant(
            "password",
            json!({ "email": email, "password": password }),
            PortalError::InvalidCredentials,
        )
        .await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<ProviderSession, PortalError> {
        self.grant(
            "refresh_token",
            json!({ "refresh_token": refresh_token }),
            PortalError::Unauthorized,
        )
        .await
    }

    async fn exchange_authorization_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<ProviderSession, PortalError> {
        self.grant(
            "pkce",
            json!({ "auth_code": code, "code_verifier": code_verifier.unwrap_or_default() }),
            PortalError::Unauthorized,
        )
        .await
    }
}
