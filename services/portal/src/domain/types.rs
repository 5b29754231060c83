use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use yk_auth_types::cookie::SessionTokens;

/// Hours a successful one-time-code verification stays fresh.
pub const OTP_EXPIRATION_HOURS: i64 = 24;

/// Default cooldown between automatic code dispatches to the same user.
pub const OTP_DISPATCH_COOLDOWN_SECS: u64 = 60;

/// Current user as resolved by the session provider from the request cookies.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: Uuid,
    pub email: Option<String>,
    pub metadata: UserMetadata,
}

/// Secondary-verification state kept in the provider's user metadata.
///
/// Key names are fixed by what is already stored for existing accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_otp_verified: Option<bool>,
    #[serde(
        default,
        with = "yk_core::serde::option_rfc3339_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub otp_verified_at: Option<DateTime<Utc>>,
}

/// The only two writes this service makes to [`UserMetadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataPatch {
    /// A one-time code was exchanged successfully at `at`.
    Verified { at: DateTime<Utc> },
    /// Logout or inactivity. The last verification time is left in place.
    Unverified,
}

impl MetadataPatch {
    /// Metadata document to merge into the provider's copy.
    pub fn to_metadata(self) -> UserMetadata {
        match self {
            Self::Verified { at } => UserMetadata {
                is_otp_verified: Some(true),
                otp_verified_at: Some(at),
            },
            Self::Unverified => UserMetadata {
                is_otp_verified: Some(false),
                otp_verified_at: None,
            },
        }
    }
}

/// A session freshly issued by the provider (sign-in, code exchange).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSession {
    pub tokens: SessionTokens,
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// Cooldown slot for a one-time code dispatch.
///
/// The guard's automatic dispatch is keyed by account, the public resend
/// endpoint by the address it was asked to mail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DispatchKey {
    User(Uuid),
    Email(String),
}

impl DispatchKey {
    /// Email key, normalized so case and padding variants share one slot.
    pub fn email(address: &str) -> Self {
        Self::Email(address.trim().to_lowercase())
    }
}

/// Where the route guard sends a request it does not let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    Login,
    OtpEntry,
    Main,
}

/// Outcome of the route guard for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(RedirectTarget),
}
