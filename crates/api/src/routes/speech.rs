//! Speech-to-text route handler.

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::services::{AudioUpload, TranscriptionService};
use crate::state::AppState;

/// Transcription response body.
#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub text: String,
}

/// `POST /speech-to-text`
///
/// Accepts a multipart upload with an `audio` (or `file`) part and proxies
/// it to the transcription vendor. The audio stays in memory end to end.
pub async fn transcribe(
    State(state): State<AppState>,
    RequireAuth(_actor): RequireAuth,
    mut multipart: Multipart,
) -> Result<Json<TranscriptResponse>> {
    let mut audio = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if !matches!(field.name(), Some("audio" | "file")) {
            continue;
        }
        let file_name = field
            .file_name()
            .unwrap_or("audio")
            .to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read audio part: {e}")))?;
        audio = Some(AudioUpload {
            bytes: bytes.to_vec(),
            file_name,
            content_type,
        });
        break;
    }

    let audio = audio.ok_or_else(|| {
        AppError::Validation("multipart body must contain an 'audio' part".to_string())
    })?;

    let service = TranscriptionService::new(
        state.config().transcription.clone(),
        state.http().clone(),
    );
    let text = service.transcribe(audio).await?;
    Ok(Json(TranscriptResponse { text }))
}
