//! Host-facing speech-to-text provider.

use super::client::WhisperClient;
use super::types::{Transcription, TranscriptionRequest};
use crate::audio::{
    encode_wav, AudioBitRate, AudioCapabilities, AudioChannels, AudioCodec, AudioFormat,
    AudioSampleRate, SpeechMetadata, WHISPER_CAPABILITIES,
};
use crate::config::{ProviderConfig, ProviderSettings};
use crate::language::LanguageList;
use crate::{BoxStream, Error, ErrorContext, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use tracing::info;

/// Audio chunks as delivered by the host pipeline.
pub type AudioStream<'a> = BoxStream<'a, Bytes>;

/// What the host speech pipeline expects from an STT backend.
#[async_trait]
pub trait SpeechToTextProvider: Send + Sync {
    fn default_language(&self) -> &str;

    fn supported_languages(&self) -> Vec<&str>;

    fn capabilities(&self) -> &AudioCapabilities;

    fn supported_formats(&self) -> &[AudioFormat] {
        self.capabilities().formats
    }

    fn supported_codecs(&self) -> &[AudioCodec] {
        self.capabilities().codecs
    }

    fn supported_bit_rates(&self) -> &[AudioBitRate] {
        self.capabilities().bit_rates
    }

    fn supported_sample_rates(&self) -> &[AudioSampleRate] {
        self.capabilities().sample_rates
    }

    fn supported_channels(&self) -> &[AudioChannels] {
        self.capabilities().channels
    }

    fn check_metadata(&self, metadata: &SpeechMetadata) -> Result<()> {
        self.capabilities().check(metadata)
    }

    /// Transcribe one utterance.
    async fn process_audio_stream(
        &self,
        metadata: &SpeechMetadata,
        stream: AudioStream<'_>,
    ) -> Result<Transcription>;
}

/// Whisper API backend.
pub struct WhisperSttProvider {
    languages: LanguageList,
    client: WhisperClient,
}

impl WhisperSttProvider {
    /// Validate a host config block and build the provider.
    pub fn from_config(config: ProviderConfig) -> Result<Self> {
        config.validate_platform()?;
        Self::from_settings(config.validate()?)
    }

    pub fn from_settings(settings: ProviderSettings) -> Result<Self> {
        let client = WhisperClient::new(&settings)?;
        info!(
            model = client.model(),
            default_language = settings.languages.default_language().as_str(),
            endpoint = client.endpoint().as_str(),
            "whisper stt provider ready"
        );
        Ok(Self {
            languages: settings.languages,
            client,
        })
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Transcribe a complete buffer of raw 16-bit little-endian PCM.
    pub async fn transcribe_pcm(
        &self,
        metadata: &SpeechMetadata,
        pcm: &[u8],
    ) -> Result<Transcription> {
        self.check_metadata(metadata)?;
        if pcm.is_empty() {
            return Err(Error::audio_with_context(
                "no audio received",
                ErrorContext::new().with_source("stt_provider"),
            ));
        }
        let wav = encode_wav(pcm, metadata)?;
        let language = self.languages.resolve(&metadata.language).clone();
        self.client
            .transcribe(TranscriptionRequest::wav(wav, language))
            .await
    }
}

#[async_trait]
impl SpeechToTextProvider for WhisperSttProvider {
    fn default_language(&self) -> &str {
        self.languages.default_language().as_str()
    }

    fn supported_languages(&self) -> Vec<&str> {
        self.languages.codes().iter().map(|c| c.as_str()).collect()
    }

    fn capabilities(&self) -> &AudioCapabilities {
        &WHISPER_CAPABILITIES
    }

    async fn process_audio_stream(
        &self,
        metadata: &SpeechMetadata,
        stream: AudioStream<'_>,
    ) -> Result<Transcription> {
        self.check_metadata(metadata)?;
        let pcm = stream
            .try_fold(Vec::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await?;
        self.transcribe_pcm(metadata, &pcm).await
    }
}
