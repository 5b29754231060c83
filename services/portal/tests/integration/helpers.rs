use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use yk_auth_types::cookie::SessionTokens;
use yk_auth_types::session::RequestSession;
use yk_domain::client::{Client, ClientScope};
use yk_domain::profile::{Profile, ProfileScope};
use yk_domain::role::Role;
use yk_portal::domain::repository::{ClientStore, DispatchThrottle, ProfileStore, SessionSource};
use yk_portal::domain::types::{
    DispatchKey, Identity, MetadataPatch, ProviderSession, UserMetadata,
};
use yk_portal::error::PortalError;

/// Every provider call the fake saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    CurrentIdentity,
    UpdateMetadata(MetadataPatch),
    Terminate,
    SendCode(String),
    VerifyCode { email: String, token: String },
    SignIn { email: String },
    Refresh(String),
    ExchangeCode(String),
}

// ── FakeSessionSource ────────────────────────────────────────────────────────

pub struct FakeSessionSource {
    pub identity: Option<Identity>,
    pub identity_fails: bool,
    pub update_fails: bool,
    pub terminate_fails: bool,
    pub send_fails: bool,
    /// Code accepted by `verify_one_time_code`.
    pub valid_code: Option<String>,
    /// Password accepted by `sign_in_with_password`.
    pub valid_password: Option<String>,
    /// Refresh token accepted by `refresh_session`.
    pub valid_refresh: Option<String>,
    pub refresh_fails: bool,
    pub calls: Arc<Mutex<Vec<SessionCall>>>,
    /// Sessions passed to metadata updates, for checking which tokens were used.
    pub update_sessions: Arc<Mutex<Vec<RequestSession>>>,
}

impl FakeSessionSource {
    pub fn new(identity: Option<Identity>) -> Self {
        Self {
            identity,
            identity_fails: false,
            update_fails: false,
            terminate_fails: false,
            send_fails: false,
            valid_code: None,
            valid_password: None,
            valid_refresh: None,
            refresh_fails: false,
            calls: Arc::new(Mutex::new(vec![])),
            update_sessions: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }

    /// Returns a shared handle to the call log for post-execution inspection.
    pub fn calls_handle(&self) -> Arc<Mutex<Vec<SessionCall>>> {
        Arc::clone(&self.calls)
    }

    pub fn update_sessions_handle(&self) -> Arc<Mutex<Vec<RequestSession>>> {
        Arc::clone(&self.update_sessions)
    }

    fn record(&self, call: SessionCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn issued_session(&self, email: &str) -> ProviderSession {
        ProviderSession {
            tokens: SessionTokens {
                access_token: "issued-access".to_owned(),
                refresh_token: "issued-refresh".to_owned(),
            },
            user_id: self.identity.as_ref().map(|i| i.id).unwrap_or_else(test_user_id),
            email: Some(email.to_owned()),
        }
    }
}

impl SessionSource for FakeSessionSource {
    async fn current_identity(
        &self,
        _session: &RequestSession,
    ) -> Result<Option<Identity>, PortalError> {
        self.record(SessionCall::CurrentIdentity);
        if self.identity_fails {
            return Err(PortalError::Internal(anyhow::anyhow!("provider unreachable")));
        }
        Ok(self.identity.clone())
    }

    async fn update_metadata(
        &self,
        session: &RequestSession,
        patch: MetadataPatch,
    ) -> Result<(), PortalError> {
        self.record(SessionCall::UpdateMetadata(patch));
        self.update_sessions.lock().unwrap().push(session.clone());
        if self.update_fails {
            return Err(PortalError::Internal(anyhow::anyhow!("update rejected")));
        }
        Ok(())
    }

    async fn terminate_session(&self, _session: &RequestSession) -> Result<(), PortalError> {
        self.record(SessionCall::Terminate);
        if self.terminate_fails {
            return Err(PortalError::Internal(anyhow::anyhow!("logout rejected")));
        }
        Ok(())
    }

    async fn send_one_time_code(&self, email: &str) -> Result<(), PortalError> {
        self.record(SessionCall::SendCode(email.to_owned()));
        if self.send_fails {
            return Err(PortalError::OtpDispatchFailed);
        }
        Ok(())
    }

    async fn verify_one_time_code(
        &self,
        email: &str,
        token: &str,
    ) -> Result<ProviderSession, PortalError> {
        self.record(SessionCall::VerifyCode {
            email: email.to_owned(),
            token: token.to_owned(),
        });
        if self.valid_code.as_deref() != Some(token) {
            return Err(PortalError::InvalidOneTimeCode);
        }
        Ok(self.issued_session(email))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, PortalError> {
        self.record(SessionCall::SignIn {
            email: email.to_owned(),
        });
        if self.valid_password.as_deref() != Some(password) {
            return Err(PortalError::InvalidCredentials);
        }
        Ok(self.issued_session(email))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<ProviderSession, PortalError> {
        self.record(SessionCall::Refresh(refresh_token.to_owned()));
        if self.refresh_fails {
            return Err(PortalError::Internal(anyhow::anyhow!("provider unreachable")));
        }
        if self.valid_refresh.as_deref() != Some(refresh_token) {
            return Err(PortalError::Unauthorized);
        }
        Ok(self.issued_session("user@example.com"))
    }

    async fn exchange_authorization_code(
        &self,
        code: &str,
        _code_verifier: Option<&str>,
    ) -> Result<ProviderSession, PortalError> {
        self.record(SessionCall::ExchangeCode(code.to_owned()));
        if code != "valid-code" {
            return Err(PortalError::Unauthorized);
        }
        Ok(self.issued_session("user@example.com"))
    }
}

// ── FakeProfileStore ─────────────────────────────────────────────────────────

pub struct FakeProfileStore {
    pub profiles: Vec<Profile>,
    pub scopes: Arc<Mutex<Vec<ProfileScope>>>,
}

impl FakeProfileStore {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self {
            profiles,
            scopes: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn scopes_handle(&self) -> Arc<Mutex<Vec<ProfileScope>>> {
        Arc::clone(&self.scopes)
    }
}

impl ProfileStore for FakeProfileStore {
    async fn find_by_id(
        &self,
        _session: &RequestSession,
        id: Uuid,
    ) -> Result<Option<Profile>, PortalError> {
        Ok(self.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn list(
        &self,
        _session: &RequestSession,
        scope: ProfileScope,
    ) -> Result<Vec<Profile>, PortalError> {
        self.scopes.lock().unwrap().push(scope);
        Ok(self
            .profiles
            .iter()
            .filter(|p| match scope {
                ProfileScope::All => true,
                ProfileScope::Client(client_id) => p.client_id == Some(client_id),
            })
            .cloned()
            .collect())
    }
}

// ── FakeClientStore ──────────────────────────────────────────────────────────

pub struct FakeClientStore {
    pub clients: Vec<Client>,
    pub scopes: Arc<Mutex<Vec<ClientScope>>>,
}

impl FakeClientStore {
    pub fn new(clients: Vec<Client>) -> Self {
        Self {
            clients,
            scopes: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn scopes_handle(&self) -> Arc<Mutex<Vec<ClientScope>>> {
        Arc::clone(&self.scopes)
    }
}

impl ClientStore for FakeClientStore {
    async fn list(
        &self,
        _session: &RequestSession,
        scope: ClientScope,
    ) -> Result<Vec<Client>, PortalError> {
        self.scopes.lock().unwrap().push(scope);
        Ok(self
            .clients
            .iter()
            .filter(|c| match scope {
                ClientScope::All => true,
                ClientScope::Only(client_id) => c.id == client_id,
            })
            .cloned()
            .collect())
    }
}

// ── FakeThrottle ─────────────────────────────────────────────────────────────

pub enum ThrottleMode {
    Open,
    Closed,
    Broken,
}

pub struct FakeThrottle {
    pub mode: ThrottleMode,
    pub acquired: Arc<Mutex<Vec<DispatchKey>>>,
}

impl FakeThrottle {
    pub fn new(mode: ThrottleMode) -> Self {
        Self {
            mode,
            acquired: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn open() -> Self {
        Self::new(ThrottleMode::Open)
    }

    pub fn acquired_handle(&self) -> Arc<Mutex<Vec<DispatchKey>>> {
        Arc::clone(&self.acquired)
    }
}

impl DispatchThrottle for FakeThrottle {
    async fn try_acquire(&self, key: &DispatchKey) -> Result<bool, PortalError> {
        self.acquired.lock().unwrap().push(key.clone());
        match self.mode {
            ThrottleMode::Open => Ok(true),
            ThrottleMode::Closed => Ok(false),
            ThrottleMode::Broken => Err(PortalError::Internal(anyhow::anyhow!("redis down"))),
        }
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_user_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap()
}

pub fn test_client_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-0000000000c1").unwrap()
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Identity whose last verification happened `hours_ago` hours before [`now`].
pub fn verified_identity(hours_ago: i64) -> Identity {
    Identity {
        id: test_user_id(),
        email: Some("user@example.com".to_owned()),
        metadata: UserMetadata {
            is_otp_verified: Some(true),
            otp_verified_at: Some(now() - chrono::Duration::hours(hours_ago)),
        },
    }
}

pub fn unverified_identity() -> Identity {
    Identity {
        id: test_user_id(),
        email: Some("user@example.com".to_owned()),
        metadata: UserMetadata::default(),
    }
}

pub fn test_client(id: Uuid, name: &str) -> Client {
    Client {
        id,
        name: name.to_owned(),
    }
}

pub fn test_profile(id: Uuid, role: Role, client_id: Option<Uuid>) -> Profile {
    Profile {
        id,
        email: Some(format!("{id}@example.com")),
        name: None,
        role,
        client_id,
    }
}

pub fn signed_in_session() -> RequestSession {
    RequestSession {
        access_token: Some("access".to_owned()),
        refresh_token: Some("refresh".to_owned()),
    }
}

/// Built front-end stand-in: a single `index.html`.
pub fn static_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("yk-portal-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<html>portal</html>").unwrap();
    dir
}
