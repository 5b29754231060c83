use anyhow::Context as _;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::PortalError;

/// HTTP access to the hosted backend (auth + REST share one project URL and key).
#[derive(Clone)]
pub struct SupabaseHttp {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseHttp {
    pub fn new(http: Client, base_url: &str, anon_key: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            anon_key,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Request with the project key. `bearer` is the user's access token;
    /// without one the call runs with the anonymous key.
    pub fn request(&self, method: Method, path: &str, bearer: Option<&str>) -> RequestBuilder {
        self.http
            .request(method, self.endpoint(path))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer.unwrap_or(self.anon_key.as_str()))
    }
}

/// Best-effort extraction of the provider's error text, for logs only.
pub async fn rejection_message(resp: Response) -> String {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|key| json.get(*key).and_then(|v| v.as_str()).map(str::to_owned))
        })
        .unwrap_or(body);
    format!("{status}: {message}")
}

/// Fail with an internal error unless the response is a 2xx.
pub async fn expect_success(resp: Response, what: &'static str) -> Result<Response, PortalError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let message = rejection_message(resp).await;
    Err(anyhow::anyhow!("{what} failed with {message}").into())
}

/// Decode a 2xx JSON body.
pub async fn expect_json<T: DeserializeOwned>(
    resp: Response,
    what: &'static str,
) -> Result<T, PortalError> {
    let resp = expect_success(resp, what).await?;
    let value = resp
        .json::<T>()
        .await
        .with_context(|| format!("decode {what} response"))?;
    Ok(value)
}
