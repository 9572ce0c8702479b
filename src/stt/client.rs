//! STT (Speech-to-Text) client.

use super::types::{Transcription, TranscriptionRequest};
use crate::config::{ApiKey, ProviderSettings};
use crate::error_code::StandardErrorCode;
use crate::{Error, ErrorContext, Result};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

/// Longest slice of an unexpected body kept in error messages.
const BODY_SNIPPET_LEN: usize = 256;

/// Client for an OpenAI-compatible `/audio/transcriptions` endpoint.
///
/// Stateless apart from the pooled HTTP client; one [`transcribe`](Self::transcribe)
/// call is exactly one POST, never retried.
pub struct WhisperClient {
    http_client: reqwest::Client,
    endpoint: Url,
    api_key: ApiKey,
    model: String,
    prompt: Option<String>,
    temperature: Option<f32>,
}

/// OpenAI-style error envelope: `{"error": {"message": ..., "type": ..., "code": ...}}`.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

impl WhisperClient {
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| {
                Error::configuration_with_context(
                    format!("Failed to create HTTP client: {}", e),
                    ErrorContext::new().with_source("stt_client"),
                )
            })?;
        Ok(Self {
            http_client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            prompt: settings.prompt.clone(),
            temperature: settings.temperature,
        })
    }

    pub async fn transcribe(&self, request: TranscriptionRequest) -> Result<Transcription> {
        let start = Instant::now();
        let audio_bytes = request.audio.len();
        let language = request.language.as_str().to_string();

        let part = reqwest::multipart::Part::bytes(request.audio)
            .file_name(request.file_name)
            .mime_str(&request.mime_type)
            .map_err(|e| Error::configuration(format!("Invalid mime: {}", e)))?;
        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("language", language.clone())
            .text("response_format", "json");
        if let Some(prompt) = &self.prompt {
            form = form.text("prompt", prompt.clone());
        }
        if let Some(temp) = self.temperature {
            form = form.text("temperature", temp.to_string());
        }

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.expose())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                info!(
                    endpoint = self.endpoint.path(),
                    timeout = e.is_timeout(),
                    duration_ms = start.elapsed().as_millis(),
                    "whisper stt request failed to reach endpoint"
                );
                Error::connectivity_with_context(
                    format!("STT request failed: {}", e),
                    e.is_timeout(),
                    ErrorContext::new().with_source("stt_client"),
                )
            })?;

        let status = response.status();
        let retry_after_ms = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok())
            .map(|secs| secs.saturating_mul(1000));
        let body = response.text().await.map_err(|e| {
            Error::connectivity_with_context(
                format!("Failed to read STT response: {}", e),
                e.is_timeout(),
                ErrorContext::new().with_source("stt_client"),
            )
        })?;

        if !status.is_success() {
            let err = remote_error(status.as_u16(), &body, retry_after_ms);
            if let Error::Remote { class, .. } = &err {
                info!(
                    http_status = status.as_u16(),
                    error_class = class.as_str(),
                    endpoint = self.endpoint.path(),
                    duration_ms = start.elapsed().as_millis(),
                    "whisper stt request failed"
                );
            }
            return Err(err);
        }

        let transcription: Transcription = serde_json::from_str(&body).map_err(|e| {
            info!(
                http_status = status.as_u16(),
                endpoint = self.endpoint.path(),
                "whisper stt response did not match the expected shape"
            );
            Error::protocol_with_context(
                format!("Unexpected STT response body: {}", e),
                ErrorContext::new()
                    .with_details(snippet(&body))
                    .with_source("stt_client"),
            )
        })?;

        debug!(
            model = self.model.as_str(),
            language = language.as_str(),
            audio_bytes,
            text_chars = transcription.text.chars().count(),
            duration_ms = start.elapsed().as_millis(),
            "whisper stt request completed"
        );
        Ok(transcription)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn remote_error(status: u16, body: &str, retry_after_ms: Option<u32>) -> Error {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);
    let code = StandardErrorCode::classify(
        status,
        parsed
            .as_ref()
            .and_then(|b| b.code.as_ref())
            .and_then(|c| c.as_str()),
        parsed.as_ref().and_then(|b| b.kind.as_deref()),
    );
    let message = parsed
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| snippet(body));

    Error::Remote {
        status,
        class: code.name().to_string(),
        message,
        retryable: code.retryable(),
        retry_after_ms,
    }
}

fn snippet(body: &str) -> String {
    match body.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
