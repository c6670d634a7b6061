//! API routes for the document assistant

pub mod ask;
pub mod sessions;
pub mod transcript;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/:id", delete(sessions::delete_session))
        .route(
            "/sessions/:id/upload",
            post(upload::upload_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/sessions/:id/ask", post(ask::ask_question))
        .route("/sessions/:id/transcript", get(transcript::get_transcript))
        .route(
            "/sessions/:id/transcript/download",
            get(transcript::download_transcript),
        )
        .route("/info", get(info))
}

/// API info endpoint
async fn info(axum::extract::State(state): axum::extract::State<AppState>) -> Json<Value> {
    let config = state.config();
    Json(json!({
        "name": "doc-qa",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Upload a PDF, DOCX or TXT file and ask questions about it",
        "llm_model": config.llm.model,
        "embedding_model": config.embeddings.model,
        "top_k": config.retrieval.top_k,
        "active_sessions": state.sessions().len(),
        "endpoints": {
            "POST /api/sessions": "Create a session",
            "DELETE /api/sessions/:id": "Delete a session",
            "POST /api/sessions/:id/upload": "Upload and index a document (multipart field 'file')",
            "POST /api/sessions/:id/ask": "Ask a question about the document",
            "GET /api/sessions/:id/transcript": "List the chat transcript",
            "GET /api/sessions/:id/transcript/download": "Download the chat transcript as text"
        }
    }))
}
