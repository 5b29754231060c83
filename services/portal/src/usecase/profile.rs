use chrono::{DateTime, Duration, Utc};

use yk_auth_types::session::RequestSession;
use yk_domain::profile::Profile;

use crate::domain::repository::{ProfileStore, SessionSource};
use crate::domain::types::Identity;
use crate::error::PortalError;
use crate::usecase::otp::is_otp_valid_within;

// ── GetMe ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Me {
    pub identity: Identity,
    pub profile: Profile,
    pub otp_verified: bool,
}

/// Current account with its profile. Reachable before OTP verification: the
/// OTP page needs the email address to offer a resend.
pub struct GetMeUseCase<S: SessionSource, P: ProfileStore> {
    pub sessions: S,
    pub profiles: P,
    pub otp_window: Duration,
}

impl<S: SessionSource, P: ProfileStore> GetMeUseCase<S, P> {
    pub async fn execute(
        &self,
        session: &RequestSession,
        now: DateTime<Utc>,
    ) -> Result<Me, PortalError> {
        let identity = self
            .sessions
            .current_identity(session)
            .await?
            .ok_or(PortalError::Unauthorized)?;
        let profile = self
            .profiles
            .find_by_id(session, identity.id)
            .await?
            .ok_or(PortalError::ProfileNotFound)?;
        let otp_verified = is_otp_valid_within(&identity.metadata, now, self.otp_window);
        Ok(Me {
            identity,
            profile,
            otp_verified,
        })
    }
}

// ── ListProfiles ─────────────────────────────────────────────────────────────

/// Profiles visible to the caller: every profile for admins, the caller's
/// client for client admins. Requires a fresh OTP verification, the same as
/// the pages that show this data.
pub struct ListProfilesUseCase<S: SessionSource, P: ProfileStore> {
    pub sessions: S,
    pub profiles: P,
    pub otp_window: Duration,
}

impl<S: SessionSource, P: ProfileStore> ListProfilesUseCase<S, P> {
    pub async fn execute(
        &self,
        session: &RequestSession,
        now: DateTime<Utc>,
    ) -> Result<Vec<Profile>, PortalError> {
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
        let scope = caller.listing_scope().ok_or(PortalError::Forbidden)?;

        self.profiles.list(session, scope).await
    }
}
