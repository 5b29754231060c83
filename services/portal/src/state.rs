use chrono::Duration;
use url::Url;

use crate::domain::routes::RouteTable;
use crate::infra::gotrue::GoTrueSessionSource;
use crate::infra::postgrest::{PostgrestClientStore, PostgrestProfileStore};
use crate::infra::supabase::SupabaseHttp;
use crate::infra::throttle::AnyDispatchThrottle;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub supabase: SupabaseHttp,
    /// Enables the local access-token pre-check when set.
    pub jwt_secret: Option<String>,
    pub throttle: AnyDispatchThrottle,
    pub routes: RouteTable,
    pub otp_window: Duration,
    pub cookie_domain: String,
    /// Public origin of the portal; callback redirects never leave it.
    pub site_url: Url,
}

impl AppState {
    pub fn session_source(&self) -> GoTrueSessionSource {
        GoTrueSessionSource {
            supabase: self.supabase.clone(),
            jwt_secret: self.jwt_secret.clone(),
        }
    }

    pub fn profile_store(&self) -> PostgrestProfileStore {
        PostgrestProfileStore {
            supabase: self.supabase.clone(),
        }
    }

    pub fn client_store(&self) -> PostgrestClientStore {
        PostgrestClientStore {
            supabase: self.supabase.clone(),
        }
    }

    pub fn dispatch_throttle(&self) -> AnyDispatchThrottle {
        self.throttle.clone()
    }
}
