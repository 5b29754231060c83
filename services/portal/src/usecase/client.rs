use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use yk_auth_types::session::RequestSession;
use yk_domain::client::Client;

use crate::domain::repository::{ClientStore, ProfileStore, SessionSource};
use crate::error::PortalError;
use crate::usecase::otp::is_otp_valid_within;

/// Clients visible to the caller: every client for admins, the caller's own
/// otherwise. Requires a fresh OTP verification.
pub struct ListClientsUseCase<S: SessionSource, P: ProfileStore, C: ClientStore> {
    pub sessions: S,
    pub profiles: P,
    pub clients: C,
    pub otp_window: Duration,
}

impl<S: SessionSource, P: ProfileStore, C: ClientStore> ListClientsUseCase<S, P, C> {
    pub async fn execute(
        &self,
        session: &RequestSession,
        now: DateTime<Utc>,
    ) -> Result<Vec<Client>, PortalError> {
        let identity = self
            .sessions
            .current_identity(session)
            .await?
            .ok_or(PortalError::Unauthorized)?;
        if !is_otp_valid_within(&identity.metadata, now, self.otp_window) {
            return Err(PortalError::Unauthorized);
        }

        let caller = self
            .profiles
            .find_by_id(session, identity.id)
            .await?
            .ok_or(PortalError::ProfileNotFound)?;
        let Some(scope) = caller.client_scope() else {
            debug!(user_id = %caller.id, role = %caller.role, "account has no client");
            return Ok(vec![]);
        };

        self.clients.list(session, scope).await
    }
}
