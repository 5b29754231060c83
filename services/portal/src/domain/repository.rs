#![allow(async_fn_in_trait)]

use uuid::Uuid;

use yk_auth_types::session::RequestSession;
use yk_domain::client::{Client, ClientScope};
use yk_domain::profile::{Profile, ProfileScope};

use crate::domain::types::{DispatchKey, Identity, MetadataPatch, ProviderSession};
use crate::error::PortalError;

/// Port for the hosted identity provider that owns sessions and user metadata.
///
/// Every call is attempted once; retry policy belongs to the caller.
pub trait SessionSource: Send + Sync {
    /// Resolve the user behind the request's session cookies.
    /// `Ok(None)` when the request carries no session or the provider rejects it.
    async fn current_identity(
        &self,
        session: &RequestSession,
    ) -> Result<Option<Identity>, PortalError>;

    /// Merge a metadata patch into the session user's metadata.
    async fn update_metadata(
        &self,
        session: &RequestSession,
        patch: MetadataPatch,
    ) -> Result<(), PortalError>;

    /// Revoke the session at the provider.
    async fn terminate_session(&self, session: &RequestSession) -> Result<(), PortalError>;

    /// Email a one-time code to an existing account.
    async fn send_one_time_code(&self, email: &str) -> Result<(), PortalError>;

    /// Exchange an emailed one-time code for a session.
    async fn verify_one_time_code(
        &self,
        email: &str,
        token: &str,
    ) -> Result<ProviderSession, PortalError>;

    /// Password sign-in.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, PortalError>;

    /// Trade a refresh token for a new token pair.
    /// A refused or already used refresh token is `Unauthorized`.
    async fn refresh_session(&self, refresh_token: &str) -> Result<ProviderSession, PortalError>;

    /// Exchange the authorization code delivered to the auth callback.
    async fn exchange_authorization_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<ProviderSession, PortalError>;
}

/// Port for the `profiles` table (role + tenant per account).
///
/// Reads run with the caller's session so row-level policies apply.
pub trait ProfileStore: Send + Sync {
    async fn find_by_id(
        &self,
        session: &RequestSession,
        id: Uuid,
    ) -> Result<Option<Profile>, PortalError>;

    async fn list(
        &self,
        session: &RequestSession,
        scope: ProfileScope,
    ) -> Result<Vec<Profile>, PortalError>;
}

/// Port for the `clients` table (tenants).
pub trait ClientStore: Send + Sync {
    async fn list(
        &self,
        session: &RequestSession,
        scope: ClientScope,
    ) -> Result<Vec<Client>, PortalError>;
}

/// Cooldown for one-time code dispatches.
pub trait DispatchThrottle: Send + Sync {
    /// Claim the dispatch slot for `key`.
    /// Returns `false` when a code already went out within the cooldown.
    async fn try_acquire(&self, key: &DispatchKey) -> Result<bool, PortalError>;
}
