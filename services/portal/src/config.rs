use crate::domain::types::{OTP_DISPATCH_COOLDOWN_SECS, OTP_EXPIRATION_HOURS};

/// Portal configuration loaded from environment variables.
#[derive(Debug)]
pub struct PortalConfig {
    /// Project URL of the hosted backend (auth + REST).
    pub supabase_url: String,
    /// Public (anon) API key sent as `apikey` on every provider call.
    pub supabase_anon_key: String,
    /// HMAC secret of the provider's access tokens. Optional; enables the
    /// local pre-check. Env var: `SUPABASE_JWT_SECRET`.
    pub supabase_jwt_secret: Option<String>,
    /// Public origin of the portal (e.g. "https://portal.example.com").
    pub site_url: String,
    /// Cookie domain attribute (e.g. "portal.example.com").
    pub cookie_domain: String,
    /// Redis URL for the shared dispatch throttle. In-process when unset.
    pub redis_url: Option<String>,
    /// TCP port to listen on (default 3000). Env var: `PORTAL_PORT`.
    pub portal_port: u16,
    /// Hours an OTP verification stays fresh (default 24).
    pub otp_expiration_hours: i64,
    /// Seconds between automatic code dispatches to one user (default 60).
    pub otp_dispatch_cooldown_secs: u64,
    /// Directory of the built front-end (default "public").
    pub static_dir: String,
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl PortalConfig {
    pub fn from_env() -> Self {
        Self {
            supabase_url: std::env::var("SUPABASE_URL").expect("SUPABASE_URL"),
            supabase_anon_key: std::env::var("SUPABASE_ANON_KEY").expect("SUPABASE_ANON_KEY"),
            supabase_jwt_secret: optional("SUPABASE_JWT_SECRET"),
            site_url: std::env::var("SITE_URL").expect("SITE_URL"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            redis_url: optional("REDIS_URL"),
            portal_port: std::env::var("PORTAL_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            otp_expiration_hours: std::env::var("OTP_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(OTP_EXPIRATION_HOURS),
            otp_dispatch_cooldown_secs: std::env::var("OTP_DISPATCH_COOLDOWN_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(OTP_DISPATCH_COOLDOWN_SECS),
            static_dir: optional("PORTAL_STATIC_DIR").unwrap_or_else(|| "public".to_owned()),
        }
    }
}
