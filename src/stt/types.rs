//! STT (Speech-to-Text) types.

use crate::language::LanguageCode;
use crate::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One utterance, ready to upload.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// Complete audio file (container included).
    pub audio: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
    pub language: LanguageCode,
}

impl TranscriptionRequest {
    pub fn wav(audio: Vec<u8>, language: LanguageCode) -> Self {
        Self {
            audio,
            file_name: "audio.wav".to_string(),
            mime_type: "audio/wav".to_string(),
            language,
        }
    }
}

/// Transcription result from the endpoint.
///
/// `text` is passed through unchanged; an empty string means no speech was
/// recognized and is not an error. The informational fields are read
/// leniently: a shape the endpoint gets wrong there becomes `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub language: Option<String>,
    /// Audio duration in seconds, when the endpoint reports it.
    #[serde(
        default,
        deserialize_with = "lenient_seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<f64>,
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Accepts `1.52` and `"1.52"`.
fn lenient_seconds<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|d| d.is_finite()),
        _ => None,
    })
}

pub type TranscriptionResult = Result<Transcription>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechResultState {
    Success,
    Error,
}

/// Host-shaped result: text plus a success/error state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechResult {
    pub text: String,
    pub state: SpeechResultState,
}

impl SpeechResult {
    pub fn is_success(&self) -> bool {
        self.state == SpeechResultState::Success
    }
}

impl From<TranscriptionResult> for SpeechResult {
    fn from(result: TranscriptionResult) -> Self {
        match result {
            Ok(t) => SpeechResult {
                text: t.text,
                state: SpeechResultState::Success,
            },
            Err(e) => {
                tracing::warn!(error = %e, "transcription failed");
                SpeechResult {
                    text: String::new(),
                    state: SpeechResultState::Error,
                }
            }
        }
    }
}
