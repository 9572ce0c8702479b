//! STT module: forwards assist pipeline audio to an OpenAI-compatible Whisper endpoint.

mod client;
mod provider;
mod types;

pub use client::WhisperClient;
pub use provider::{AudioStream, SpeechToTextProvider, WhisperSttProvider};
pub use types::{
    SpeechResult, SpeechResultState, Transcription, TranscriptionRequest, TranscriptionResult,
};
