//! Speech-to-text via Groq's hosted Whisper endpoint.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::error::TranscribeError;

/// Groq audio transcription endpoint (OpenAI-compatible).
pub const GROQ_TRANSCRIPTION_URL: &str = "https://api.groq.com/openai/v1/audio/transcriptions";

/// What the recognizer heard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transcript {
    /// Recognized speech, trimmed.
    Text(String),
    /// The audio held no intelligible speech.
    NoMatch,
}

impl Transcript {
    fn from_raw(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            Transcript::NoMatch
        } else {
            Transcript::Text(text.to_string())
        }
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Client for the hosted Whisper model.
pub struct Transcriber {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl Transcriber {
    /// Creates a transcriber.
    ///
    /// # Errors
    /// Returns `TranscribeError::Config` if `api_key` is empty.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, TranscribeError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TranscribeError::Config("GROQ_API_KEY is not set".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
        })
    }

    /// Transcribes an English WAV recording.
    ///
    /// # Arguments
    /// * `path` - WAV file to upload.
    ///
    /// # Returns
    /// * `Transcript::Text` - what was said.
    /// * `Transcript::NoMatch` - nothing recognizable.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the request fails.
    pub async fn transcribe_file(&self, path: &Path) -> Result<Transcript, TranscribeError> {
        let audio = tokio::fs::read(path).await?;
        tracing::debug!(audio_bytes = audio.len(), "starting Whisper transcription");

        let file = Part::bytes(audio)
            .file_name("speech.wav")
            .mime_str("audio/wav")?;
        let form = Form::new()
            .text("model", self.model.clone())
            .text("language", "en")
            .text("response_format", "json")
            .part("file", file);

        let response = self
            .client
            .post(GROQ_TRANSCRIPTION_URL)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Whisper API error");
            return Err(TranscribeError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let result: TranscriptionResponse = response.json().await?;
        tracing::info!(transcript = %result.text, "transcription complete");
        Ok(Transcript::from_raw(&result.text))
    }
}
