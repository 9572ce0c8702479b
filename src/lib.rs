//! # whisper-api-stt
//!
//! Speech-to-text provider adapter that lets a home-automation assist pipeline
//! use an OpenAI-compatible Whisper transcription API as its STT backend.
//!
//! ## Overview
//!
//! The host declares a config block selecting this adapter (`platform:
//! whisper_api_stt`) with an API key, a model name and an ISO-639-1 language.
//! The configuration is validated once, at setup time; afterwards each
//! utterance results in exactly one multipart POST to the transcription
//! endpoint, and the recognized text (or a typed [`Error`]) is handed back to
//! the host.
//!
//! - **Stateless**: no cross-request state; a provider can be shared freely
//! - **Single attempt**: no retries, no caching; the host decides what to do next
//! - **Bounded**: every call is limited by the configured request timeout
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use whisper_api_stt::{get_engine, ProviderConfig, SpeechMetadata, SpeechToTextProvider};
//!
//! #[tokio::main]
//! async fn main() -> whisper_api_stt::Result<()> {
//!     let provider = get_engine(ProviderConfig::new("sk-...", "whisper-1", "en"))?;
//!
//!     let pcm: Vec<u8> = vec![0; 32_000]; // one second of 16 kHz mono silence
//!     let metadata = SpeechMetadata::pcm_16khz_mono("en-US");
//!     let transcription = provider.transcribe_pcm(&metadata, &pcm).await?;
//!     println!("{} ({})", transcription.text, provider.default_language());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Host configuration block and its validation |
//! | [`language`] | ISO-639-1 language codes |
//! | [`audio`] | Audio metadata, supported layouts, PCM to WAV wrapping |
//! | [`stt`] | Transcription client and host-facing provider |
//! | [`error_code`] | Classification of remote failures |

pub mod audio;
pub mod config;
pub mod error_code;
pub mod language;
pub mod stt;

pub use audio::SpeechMetadata;
pub use config::{ProviderConfig, ProviderSettings, PLATFORM};
pub use language::{LanguageCode, LanguageList};
pub use stt::{
    AudioStream, SpeechResult, SpeechResultState, SpeechToTextProvider, Transcription,
    TranscriptionRequest, WhisperClient, WhisperSttProvider,
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Set up the adapter from the host's config block.
///
/// Fails with [`Error::Configuration`] when the block does not select this
/// platform or any required key is missing or invalid. No network call is made.
pub fn get_engine(config: ProviderConfig) -> Result<WhisperSttProvider> {
    WhisperSttProvider::from_config(config)
}

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
