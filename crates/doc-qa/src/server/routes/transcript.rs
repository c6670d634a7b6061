//! Transcript listing and download endpoints

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::server::extract::ApiPath;
use crate::server::state::AppState;
use crate::types::TranscriptResponse;

/// GET /api/sessions/:id/transcript - List the chat transcript
pub async fn get_transcript(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<TranscriptResponse>> {
    let handle = state.sessions().get(id)?;
    let session = handle.lock().await;

    Ok(Json(TranscriptResponse {
        session_id: id,
        document: session.document().cloned(),
        turns: session.transcript().turns().to_vec(),
    }))
}

/// GET /api/sessions/:id/transcript/download - Transcript as a text attachment
pub async fn download_transcript(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse> {
    let handle = state.sessions().get(id)?;
    let exported = {
        let session = handle.lock().await;
        state.assistant().export(&session)?
    };

    let body = tokio::fs::read_to_string(exported.path()).await?;
    let disposition = format!("attachment; filename=\"chat-{}.txt\"", id);

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
