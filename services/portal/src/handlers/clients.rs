use axum::{Json, extract::State};
use chrono::Utc;

use yk_auth_types::session::RequestSession;
use yk_domain::client::Client;

use crate::error::PortalError;
use crate::handlers::profiles::Data;
use crate::state::AppState;
use crate::usecase::client::ListClientsUseCase;

// ── GET /api/clients ─────────────────────────────────────────────────────────

pub async fn list_clients(
    State(state): State<AppState>,
    session: RequestSession,
) -> Result<Json<Data<Vec<Client>>>, PortalError> {
    let usecase = ListClientsUseCase {
        sessions: state.session_source(),
        profiles: state.profile_store(),
        clients: state.client_store(),
        otp_window: state.otp_window,
    };
    let clients = usecase.execute(&session, Utc::now()).await?;
    Ok(Json(Data { data: clients }))
}
