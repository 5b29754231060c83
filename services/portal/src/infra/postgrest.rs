use anyhow::Context as _;
use reqwest::Method;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use yk_auth_types::session::RequestSession;
use yk_domain::client::{Client, ClientScope};
use yk_domain::profile::{Profile, ProfileScope};

use crate::domain::repository::{ClientStore, ProfileStore};
use crate::error::PortalError;
use crate::infra::supabase::{SupabaseHttp, expect_json};

const PROFILE_COLUMNS: &str = "id,email,name,role,client_id";
const CLIENT_COLUMNS: &str = "id,name";

/// [`ProfileStore`] over the provider's PostgREST endpoint (`/rest/v1`).
#[derive(Clone)]
pub struct PostgrestProfileStore {
    pub supabase: SupabaseHttp,
}

/// [`ClientStore`] over the same endpoint.
#[derive(Clone)]
pub struct PostgrestClientStore {
    pub supabase: SupabaseHttp,
}

/// GET a PostgREST path with the caller's token so row-level policies apply.
async fn fetch_rows<T: DeserializeOwned>(
    supabase: &SupabaseHttp,
    session: &RequestSession,
    path: &str,
    what: &'static str,
) -> Result<Vec<T>, PortalError> {
    let access_token = session
        .access_token
        .as_deref()
        .ok_or(PortalError::Unauthorized)?;
    let resp = supabase
        .request(Method::GET, path, Some(access_token))
        .send()
        .await
        .with_context(|| format!("{what} request"))?;
    if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
        return Err(PortalError::Unauthorized);
    }
    expect_json(resp, what).await
}

fn profiles_path(filter: Option<String>) -> String {
    match filter {
        Some(filter) => format!("rest/v1/profiles?select={PROFILE_COLUMNS}&{filter}"),
        None => format!("rest/v1/profiles?select={PROFILE_COLUMNS}&order=email.asc"),
    }
}

fn scope_filter(scope: ProfileScope) -> Option<String> {
    match scope {
        ProfileScope::All => None,
        ProfileScope::Client(client_id) => Some(format!("client_id=eq.{client_id}&order=email.asc")),
    }
}

fn clients_path(scope: ClientScope) -> String {
    match scope {
        ClientScope::All => format!("rest/v1/clients?select={CLIENT_COLUMNS}&order=name.asc"),
        ClientScope::Only(client_id) => {
            format!("rest/v1/clients?select={CLIENT_COLUMNS}&id=eq.{client_id}")
        }
    }
}

impl ProfileStore for PostgrestProfileStore {
    async fn find_by_id(
        &self,
        session: &RequestSession,
        id: Uuid,
    ) -> Result<Option<Profile>, PortalError> {
        let path = profiles_path(Some(format!("id=eq.{id}&limit=1")));
        let rows: Vec<Profile> =
            fetch_rows(&self.supabase, session, &path, "PostgREST profiles").await?;
        Ok(rows.into_iter().next())
    }

    async fn list(
        &self,
        session: &RequestSession,
        scope: ProfileScope,
    ) -> Result<Vec<Profile>, PortalError> {
        let path = profiles_path(scope_filter(scope));
        fetch_rows(&self.supabase, session, &path, "PostgREST profiles").await
    }
}

impl ClientStore for PostgrestClientStore {
    async fn list(
        &self,
        session: &RequestSession,
        scope: ClientScope,
    ) -> Result<Vec<Client>, PortalError> {
        fetch_rows(&self.supabase, session, &clients_path(scope), "PostgREST clients").await
    }
}
