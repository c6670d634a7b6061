//! Session lifecycle endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::server::extract::ApiPath;
use crate::server::state::AppState;
use crate::types::SessionCreated;

/// POST /api/sessions - Create an empty session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions().create();
    tracing::info!("Session {} created", session_id);
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

/// DELETE /api/sessions/:id - Drop a session with its index and transcript
pub async fn delete_session(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode> {
    state.sessions().remove(id)?;
    tracing::info!("Session {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
