//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::analysis::models::AnalysisResult;
use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::state::AppState;

/// Multipart field carrying the resume file.
const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub analysis: AnalysisResult,
}

struct UploadedFile {
    content_type: Option<String>,
    data: Bytes,
}

/// POST /api/upload
///
/// Extracts text from the uploaded resume and returns its analysis.
/// Analysis itself cannot fail; only a missing or unreadable upload is an error.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let upload = read_resume_field(multipart)
        .await?
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    info!(
        bytes = upload.data.len(),
        content_type = upload.content_type.as_deref().unwrap_or("unknown"),
        "Resume uploaded"
    );

    // PDF parsing is CPU-bound; keep it off the async workers.
    let text = tokio::task::spawn_blocking(move || {
        extract_text(&upload.data, upload.content_type.as_deref())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("text extraction task failed: {e}")))??;

    let analysis = state.analyzer.analyze(&text).await;

    Ok(Json(UploadResponse { analysis }))
}

async fn read_resume_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;

        return Ok(Some(UploadedFile { content_type, data }));
    }

    Ok(None)
}
