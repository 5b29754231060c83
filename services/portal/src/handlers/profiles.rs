use axum::{Json, extract::State};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use yk_auth_types::session::RequestSession;
use yk_domain::profile::Profile;
use yk_domain::role::Role;

use crate::error::PortalError;
use crate::state::AppState;
use crate::usecase::profile::{GetMeUseCase, ListProfilesUseCase};

#[derive(Serialize)]
pub struct Data<T> {
    pub data: T,
}

// ── GET /api/me ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Role,
    pub client_id: Option<Uuid>,
    pub otp_verified: bool,
}

pub async fn get_me(
    State(state): State<AppState>,
    session: RequestSession,
) -> Result<Json<Data<MeResponse>>, PortalError> {
    let usecase = GetMeUseCase {
        sessions: state.session_source(),
        profiles: state.profile_store(),
        otp_window: state.otp_window,
    };
    let me = usecase.execute(&session, Utc::now()).await?;
    Ok(Json(Data {
        data: MeResponse {
            id: me.identity.id,
            email: me.identity.email,
            name: me.profile.name,
            role: me.profile.role,
            client_id: me.profile.client_id,
            otp_verified: me.otp_verified,
        },
    }))
}

// ── GET /api/profiles ────────────────────────────────────────────────────────

pub async fn list_profiles(
    State(state): State<AppState>,
    session: RequestSession,
) -> Result<Json<Data<Vec<Profile>>>, PortalError> {
    let usecase = ListProfilesUseCase {
        sessions: state.session_source(),
        profiles: state.profile_store(),
        otp_window: state.otp_window,
    };
    let profiles = usecase.execute(&session, Utc::now()).await?;
    Ok(Json(Data { data: profiles }))
}
