use chrono::{DateTime, Duration, Utc};

use crate::domain::types::{OTP_EXPIRATION_HOURS, UserMetadata};

/// Whether the user's last one-time-code verification is still fresh.
///
/// False when the flag is missing or false, or the timestamp is missing.
/// Otherwise true iff less than [`OTP_EXPIRATION_HOURS`] elapsed since it.
pub fn is_otp_valid(metadata: &UserMetadata, now: DateTime<Utc>) -> bool {
    is_otp_valid_within(metadata, now, Duration::hours(OTP_EXPIRATION_HOURS))
}

/// [`is_otp_valid`] with an explicit validity window.
pub fn is_otp_valid_within(metadata: &UserMetadata, now: DateTime<Utc>, window: Duration) -> bool {
    if metadata.is_otp_verified != Some(true) {
        return false;
    }
    let Some(verified_at) = metadata.otp_verified_at else {
        return false;
    };
    now.signed_duration_since(verified_at) < window
}
