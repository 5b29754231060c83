//! HTTP client for the portal's own session API.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use url::Url;
use uuid::Uuid;

use yk_domain::role::Role;

use crate::error::ClientError;

/// Account returned by sign-in and code verification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// Current account as reported by `GET /api/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Me {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Role,
    pub client_id: Option<Uuid>,
    pub otp_verified: bool,
}

#[derive(Deserialize)]
struct Data<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    kind: String,
}

/// Portal API client. Keeps the session cookies the portal sets, the way a
/// browser would, so a sign-in followed by other calls shares one session.
#[derive(Clone)]
pub struct PortalClient {
    http: Client,
    base_url: Url,
}

impl PortalClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(http, Url::parse(base_url)?))
    }

    /// Use a preconfigured client. It needs a cookie store for the session to
    /// carry over between calls.
    pub fn with_client(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(path)?;
        Ok(self.http.request(method, url))
    }

    /// `POST /api/auth/login`
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ClientError> {
        let resp = self
            .request(Method::POST, "/api/auth/login")?
            .form(&[("email", email), ("password", password)])
            .send()
            .await?;
        let body: Data<SessionUser> = expect_success(resp).await?.json().await?;
        Ok(body.data)
    }

    /// `POST /api/auth/login/otp/send`
    pub async fn send_one_time_code(&self, email: &str) -> Result<(), ClientError> {
        let resp = self
            .request(Method::POST, "/api/auth/login/otp/send")?
            .form(&[("email", email)])
            .send()
            .await?;
        expect_success(resp).await?;
        Ok(())
    }

    /// `POST /api/auth/login/otp/verify`
    pub async fn verify_one_time_code(
        &self,
        email: &str,
        token: &str,
    ) -> Result<SessionUser, ClientError> {
        let resp = self
            .request(Method::POST, "/api/auth/login/otp/verify")?
            .form(&[("email", email), ("token", token)])
            .send()
            .await?;
        let body: Data<SessionUser> = expect_success(resp).await?.json().await?;
        Ok(body.data)
    }

    /// `PATCH /api/users/{user_id}/otpVerify`
    pub async fn set_otp_verified(&self, user_id: Uuid, verified: bool) -> Result<(), ClientError> {
        let resp = self
            .request(Method::PATCH, &format!("/api/users/{user_id}/otpVerify"))?
            .json(&json!({ "verified": verified }))
            .send()
            .await?;
        expect_success(resp).await?;
        Ok(())
    }

    /// `POST /api/auth/logout`
    pub async fn logout(&self) -> Result<(), ClientError> {
        let resp = self
            .request(Method::POST, "/api/auth/logout")?
            .send()
            .await?;
        expect_success(resp).await?;
        Ok(())
    }

    /// `GET /api/me`
    pub async fn me(&self) -> Result<Me, ClientError> {
        let resp = self.request(Method::GET, "/api/me")?.send().await?;
        let body: Data<Me> = expect_success(resp).await?.json().await?;
        Ok(body.data)
    }
}

async fn expect_success(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let kind = resp
        .json::<ErrorBody>()
        .await
        .map(|body| body.kind)
        .unwrap_or_else(|_| "UNKNOWN".to_owned());
    Err(ClientError::Rejected {
        status: status.as_u16(),
        kind,
    })
}
