//! Static classification of the portal's page paths.

use crate::domain::types::RedirectTarget;

/// Page paths the route guard knows by name. Every other path is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTable {
    pub home: &'static str,
    pub login: &'static str,
    pub otp_entry: &'static str,
    pub main: &'static str,
    pub password_recovery: &'static str,
    pub password_reset: &'static str,
    pub auth_callback: &'static str,
}

pub const ROUTES: RouteTable = RouteTable {
    home: "/",
    login: "/login",
    otp_entry: "/otp",
    main: "/main",
    password_recovery: "/password-recovery",
    password_reset: "/password-reset",
    auth_callback: "/auth/callback",
};

impl Default for RouteTable {
    fn default() -> Self {
        ROUTES
    }
}

impl RouteTable {
    /// Paths reachable without any identity.
    ///
    /// The password-reset page is protected: the recovery link signs the user
    /// in through the auth callback before the page is shown.
    pub fn is_unprotected(&self, path: &str) -> bool {
        path == self.login || path == self.password_recovery || path == self.auth_callback
    }

    pub fn path_of(&self, target: RedirectTarget) -> &'static str {
        match target {
            RedirectTarget::Login => self.login,
            RedirectTarget::OtpEntry => self.otp_entry,
            RedirectTarget::Main => self.main,
        }
    }
}

/// Paths that never touch the session: static assets and health checks.
pub fn is_session_exempt(path: &str) -> bool {
    const EXEMPT_PREFIXES: [&str; 2] = ["/static/", "/assets/"];
    const EXEMPT_PATHS: [&str; 3] = ["/favicon.ico", "/healthz", "/readyz"];

    EXEMPT_PATHS.contains(&path) || EXEMPT_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Paths the guard never sees: API routes authorize themselves, static assets
/// and health checks carry no user data.
pub fn is_guard_exempt(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/") || is_session_exempt(path)
}
