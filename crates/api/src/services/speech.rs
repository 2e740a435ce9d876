//! Speech-to-text proxy for dictated reviews.
//!
//! Audio never touches disk: the uploaded bytes are forwarded to the
//! Whisper-compatible vendor endpoint as multipart form data and only the
//! transcript text comes back to the client. The vendor API key stays
//! server-side.

use reqwest::multipart::{Form, Part};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use crate::config::TranscriptionConfig;
use crate::error::AppError;

/// Model name sent to the vendor.
const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Errors from the transcription vendor call.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The request never completed (connect, timeout, body).
    #[error("transcription request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The vendor answered with a non-success status.
    #[error("transcription vendor returned {status}: {message}")]
    Vendor { status: u16, message: String },

    /// The vendor answered 2xx but not with the expected JSON shape.
    #[error("malformed transcription response")]
    MalformedResponse,
}

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        Self::Upstream(err.to_string())
    }
}

/// An audio file pulled out of a multipart upload.
#[derive(Debug)]
pub struct AudioUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

#[derive(Debug, Deserialize)]
struct VendorResponse {
    text: String,
}

/// Client for the speech-to-text vendor.
#[derive(Debug, Clone)]
pub struct TranscriptionService {
    config: TranscriptionConfig,
    http: reqwest::Client,
}

impl TranscriptionService {
    #[must_use]
    pub const fn new(config: TranscriptionConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Transcribe an audio upload, returning the transcript text.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError`] if the vendor is unreachable, rejects the
    /// request, or responds with an unexpected body.
    pub async fn transcribe(&self, audio: AudioUpload) -> Result<String, SpeechError> {
        let file = Part::bytes(audio.bytes)
            .file_name(audio.file_name)
            .mime_str(&audio.content_type)?;
        let form = Form::new()
            .part("file", file)
            .text("model", TRANSCRIPTION_MODEL);

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(self.config.api_key.expose_secret())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Transcription vendor error");
            return Err(SpeechError::Vendor {
                status: status.as_u16(),
                message,
            });
        }

        let payload: VendorResponse = response
            .json()
            .await
            .map_err(|_| SpeechError::MalformedResponse)?;
        Ok(payload.text)
    }
}
