//! Document upload endpoint

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::extract::ApiPath;
use crate::server::state::AppState;
use crate::types::{Document, UploadResponse};

/// POST /api/sessions/:id/upload - Index the file in multipart field `file`
pub async fn upload_document(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let mut multipart = multipart?;
    let handle = state.sessions().get(id)?;
    let document = read_file_field(&mut multipart).await?;

    let start = Instant::now();
    let mut session = handle.lock().await;
    let outcome = state.assistant().upload(&mut session, document).await?;

    tracing::info!(
        "Indexed {} into session {} in {} ms",
        outcome.document.filename,
        id,
        start.elapsed().as_millis()
    );

    Ok(Json(UploadResponse::new(
        &outcome,
        session.transcript().turns().to_vec(),
    )))
}

/// First multipart field named `file`, or the first field carrying a filename
async fn read_file_field(multipart: &mut Multipart) -> Result<Document> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let is_file = field.name() == Some("file") || field.file_name().is_some();
        if !is_file {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::BadRequest(format!("Failed to read file: {}", e)))?;

        tracing::info!("Received file: {} ({} bytes)", filename, data.len());
        return Ok(Document::from_bytes(filename, data.to_vec()));
    }

    Err(Error::BadRequest("No file uploaded".to_string()))
}
