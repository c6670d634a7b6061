//! Question endpoint

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::assistant::AskOutcome;
use crate::error::{Error, Result};
use crate::server::extract::{ApiJson, ApiPath};
use crate::server::state::AppState;
use crate::types::AskResponse;

/// Request body of the ask endpoint
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// POST /api/sessions/:id/ask - Answer a question about the session's document
pub async fn ask_question(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<AskRequest>,
) -> Result<Json<AskResponse>> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(Error::BadRequest("Question cannot be empty".to_string()));
    }

    let handle = state.sessions().get(id)?;
    let mut session = handle.lock().await;

    tracing::info!("Session {}: {}", id, question);
    let outcome = state.assistant().ask(&mut session, question).await?;

    let transcript = match &outcome {
        AskOutcome::Answered { .. } => session.transcript().turns().to_vec(),
        AskOutcome::Warning { turn } => session.transcript().with_turn(turn.clone()),
    };

    Ok(Json(AskResponse::new(&outcome, transcript)))
}
