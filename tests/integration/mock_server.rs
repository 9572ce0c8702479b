//! Mock HTTP server setup for integration tests

use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use tokio::sync::Mutex;
use whisper_api_stt::{ProviderConfig, WhisperSttProvider};

pub const TRANSCRIPTIONS_PATH: &str = "/v1/audio/transcriptions";
pub const TEST_API_KEY: &str = "sk-test-key";

/// Test fixture that manages a mock transcription endpoint
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, TRANSCRIPTIONS_PATH)
    }

    /// Config pointing at the mock server, not yet validated
    pub fn config(&self, language: &str) -> ProviderConfig {
        ProviderConfig::new(TEST_API_KEY, "whisper-1", language)
            .with_url(self.endpoint())
            .with_timeout_ms(5_000)
    }

    pub fn provider(&self, language: &str) -> WhisperSttProvider {
        whisper_api_stt::get_engine(self.config(language)).expect("Failed to build provider")
    }

    /// Successful transcription; also checks the bearer header and multipart layout
    pub async fn mock_transcription(&self, text: &str) -> Mock {
        self.mock_transcription_hits(text, 1).await
    }

    pub async fn mock_transcription_hits(&self, text: &str, hits: usize) -> Mock {
        let body = serde_json::json!({ "text": text }).to_string();
        let mut server = self.server.lock().await;
        server
            .mock("POST", TRANSCRIPTIONS_PATH)
            .match_header("authorization", format!("Bearer {}", TEST_API_KEY).as_str())
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                form_field("model", "whisper-1"),
                Matcher::Regex(r#"name="file"; filename="audio.wav""#.to_string()),
                Matcher::Regex("RIFF".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Successful transcription that only matches when the given form fields are present
    pub async fn mock_transcription_with_fields(&self, fields: &[(&str, &str)], text: &str) -> Mock {
        let body = serde_json::json!({ "text": text }).to_string();
        let matchers = fields
            .iter()
            .map(|(name, value)| form_field(name, value))
            .collect();
        let mut server = self.server.lock().await;
        server
            .mock("POST", TRANSCRIPTIONS_PATH)
            .match_body(Matcher::AllOf(matchers))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Raw response with an arbitrary status and body
    pub async fn mock_raw_response(&self, status: usize, body: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", TRANSCRIPTIONS_PATH)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Error response carrying a retry-after header
    pub async fn mock_error_with_retry_after(
        &self,
        status: usize,
        error_body: &str,
        retry_after_secs: u32,
    ) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", TRANSCRIPTIONS_PATH)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_header("retry-after", &retry_after_secs.to_string())
            .with_body(error_body)
            .create_async()
            .await
    }

    /// Any POST; used with `expect(0)` to prove nothing was sent
    pub async fn mock_any(&self) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"text":""}"#)
            .expect(0)
            .create_async()
            .await
    }
}

/// Matches one text field of a multipart body
pub fn form_field(name: &str, value: &str) -> Matcher {
    Matcher::Regex(format!(
        "name=\"{}\"\r\n\r\n{}\r\n",
        regex_escape(name),
        regex_escape(value)
    ))
}

fn regex_escape(raw: &str) -> String {
    raw.chars()
        .flat_map(|c| {
            let escape = r"\.+*?()|[]{}^$#&-~".contains(c);
            escape.then_some('\\').into_iter().chain(std::iter::once(c))
        })
        .collect()
}

/// Raw 16-bit mono PCM at 16 kHz
pub fn pcm_tone(millis: usize) -> Vec<u8> {
    let samples = 16 * millis;
    (0..samples)
        .flat_map(|i| {
            let sample = if i % 32 < 16 { 8_000i16 } else { -8_000i16 };
            sample.to_le_bytes()
        })
        .collect()
}
