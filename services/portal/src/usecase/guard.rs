use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use yk_auth_types::session::RequestSession;

use crate::domain::repository::{DispatchThrottle, SessionSource};
use crate::domain::routes::RouteTable;
use crate::domain::types::{DispatchKey, GuardDecision, Identity, RedirectTarget};
use crate::usecase::otp::is_otp_valid_within;

pub struct GuardInput<'a> {
    pub path: &'a str,
    pub session: &'a RequestSession,
    pub now: DateTime<Utc>,
}

/// Per-request access decision for page routes.
///
/// Rules, first match wins:
/// 1. the auth callback is always allowed;
/// 2. provider errors while resolving the identity count as anonymous;
/// 3. signed in but not freshly verified, outside the OTP page: send a code
///    and go to the OTP page;
/// 4. verified users on the login or OTP page go to main;
/// 5. verified users on home go to main;
/// 6. anonymous users on a protected page go to login;
/// 7. everything else is allowed.
pub struct RouteGuardUseCase<S: SessionSource, T: DispatchThrottle> {
    pub sessions: S,
    pub throttle: T,
    pub routes: RouteTable,
    pub otp_window: Duration,
}

impl<S: SessionSource, T: DispatchThrottle> RouteGuardUseCase<S, T> {
    pub async fn execute(&self, input: GuardInput<'_>) -> GuardDecision {
        let routes = &self.routes;
        let path = input.path;

        // The callback carries the token exchange; it must never bounce.
        if path == routes.auth_callback {
            return GuardDecision::Allow;
        }

        let identity = match self.sessions.current_identity(input.session).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = ?e, path, "identity lookup failed, treating request as anonymous");
                None
            }
        };

        let Some(identity) = identity else {
            if routes.is_unprotected(path) {
                return GuardDecision::Allow;
            }
            return GuardDecision::Redirect(RedirectTarget::Login);
        };

        if !is_otp_valid_within(&identity.metadata, input.now, self.otp_window) {
            if path == routes.otp_entry {
                return GuardDecision::Allow;
            }
            self.dispatch_code(&identity).await;
            return GuardDecision::Redirect(RedirectTarget::OtpEntry);
        }

        if path == routes.login || path == routes.otp_entry || path == routes.home {
            return GuardDecision::Redirect(RedirectTarget::Main);
        }

        GuardDecision::Allow
    }

    /// Send a fresh code ahead of the OTP-page redirect. Never fails: the user
    /// can always request a resend from the OTP page.
    async fn dispatch_code(&self, identity: &Identity) {
        let Some(email) = identity.email.as_deref() else {
            warn!(user_id = %identity.id, "identity has no email, cannot dispatch one-time code");
            return;
        };

        match self.throttle.try_acquire(&DispatchKey::User(identity.id)).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(user_id = %identity.id, "one-time code dispatched recently, skipping");
                return;
            }
            Err(e) => {
                warn!(user_id = %identity.id, error = ?e, "dispatch throttle unavailable, sending anyway");
            }
        }

        match self.sessions.send_one_time_code(email).await {
            Ok(()) => info!(user_id = %identity.id, "one-time code dispatched"),
            Err(e) => {
                warn!(user_id = %identity.id, error = ?e, "one-time code dispatch failed")
            }
        }
    }
}
