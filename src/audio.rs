//! Audio metadata negotiated with the host pipeline, and WAV wrapping.
//!
//! The host streams raw little-endian PCM and describes it with
//! [`SpeechMetadata`]. The transcription endpoint expects a file upload, so the
//! samples are wrapped in a WAV container in memory before sending.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Audio container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Ogg,
}

/// Audio codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    Pcm,
    Opus,
}

/// Bits per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum AudioBitRate {
    Bits8,
    Bits16,
    Bits24,
    Bits32,
}

impl AudioBitRate {
    pub fn bits(&self) -> u16 {
        match self {
            Self::Bits8 => 8,
            Self::Bits16 => 16,
            Self::Bits24 => 24,
            Self::Bits32 => 32,
        }
    }
}

impl TryFrom<u16> for AudioBitRate {
    type Error = String;

    fn try_from(bits: u16) -> std::result::Result<Self, Self::Error> {
        match bits {
            8 => Ok(Self::Bits8),
            16 => Ok(Self::Bits16),
            24 => Ok(Self::Bits24),
            32 => Ok(Self::Bits32),
            other => Err(format!("unsupported bit rate: {}", other)),
        }
    }
}

impl From<AudioBitRate> for u16 {
    fn from(rate: AudioBitRate) -> Self {
        rate.bits()
    }
}

/// Samples per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum AudioSampleRate {
    Hz8000,
    Hz11000,
    Hz16000,
    Hz18900,
    Hz22000,
    Hz32000,
    Hz37800,
    Hz44100,
    Hz48000,
}

impl AudioSampleRate {
    pub fn hz(&self) -> u32 {
        match self {
            Self::Hz8000 => 8000,
            Self::Hz11000 => 11000,
            Self::Hz16000 => 16000,
            Self::Hz18900 => 18900,
            Self::Hz22000 => 22000,
            Self::Hz32000 => 32000,
            Self::Hz37800 => 37800,
            Self::Hz44100 => 44100,
            Self::Hz48000 => 48000,
        }
    }
}

impl TryFrom<u32> for AudioSampleRate {
    type Error = String;

    fn try_from(hz: u32) -> std::result::Result<Self, Self::Error> {
        let rate = match hz {
            8000 => Self::Hz8000,
            11000 => Self::Hz11000,
            16000 => Self::Hz16000,
            18900 => Self::Hz18900,
            22000 => Self::Hz22000,
            32000 => Self::Hz32000,
            37800 => Self::Hz37800,
            44100 => Self::Hz44100,
            48000 => Self::Hz48000,
            other => return Err(format!("unsupported sample rate: {}", other)),
        };
        Ok(rate)
    }
}

impl From<AudioSampleRate> for u32 {
    fn from(rate: AudioSampleRate) -> Self {
        rate.hz()
    }
}

/// Channel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum AudioChannels {
    Mono,
    Stereo,
}

impl AudioChannels {
    pub fn count(&self) -> u16 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

impl TryFrom<u16> for AudioChannels {
    type Error = String;

    fn try_from(count: u16) -> std::result::Result<Self, Self::Error> {
        match count {
            1 => Ok(Self::Mono),
            2 => Ok(Self::Stereo),
            other => Err(format!("unsupported channel count: {}", other)),
        }
    }
}

impl From<AudioChannels> for u16 {
    fn from(channels: AudioChannels) -> Self {
        channels.count()
    }
}

/// Description of the audio stream handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechMetadata {
    /// Language requested by the host, possibly region-qualified (`en-US`).
    pub language: String,
    pub format: AudioFormat,
    pub codec: AudioCodec,
    pub bit_rate: AudioBitRate,
    pub sample_rate: AudioSampleRate,
    pub channel: AudioChannels,
}

impl SpeechMetadata {
    /// 16-bit mono PCM at 16 kHz, the only layout this adapter accepts.
    pub fn pcm_16khz_mono(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            format: AudioFormat::Wav,
            codec: AudioCodec::Pcm,
            bit_rate: AudioBitRate::Bits16,
            sample_rate: AudioSampleRate::Hz16000,
            channel: AudioChannels::Mono,
        }
    }
}

/// The audio layouts a provider can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioCapabilities {
    pub formats: &'static [AudioFormat],
    pub codecs: &'static [AudioCodec],
    pub bit_rates: &'static [AudioBitRate],
    pub sample_rates: &'static [AudioSampleRate],
    pub channels: &'static [AudioChannels],
}

impl AudioCapabilities {
    /// Reject metadata outside the supported layouts before any upload.
    pub fn check(&self, metadata: &SpeechMetadata) -> Result<()> {
        if !self.formats.contains(&metadata.format) {
            return Err(unsupported("metadata.format", format!("{:?}", metadata.format)));
        }
        if !self.codecs.contains(&metadata.codec) {
            return Err(unsupported("metadata.codec", format!("{:?}", metadata.codec)));
        }
        if !self.bit_rates.contains(&metadata.bit_rate) {
            return Err(unsupported("metadata.bit_rate", metadata.bit_rate.bits().to_string()));
        }
        if !self.sample_rates.contains(&metadata.sample_rate) {
            return Err(unsupported(
                "metadata.sample_rate",
                metadata.sample_rate.hz().to_string(),
            ));
        }
        if !self.channels.contains(&metadata.channel) {
            return Err(unsupported("metadata.channel", metadata.channel.count().to_string()));
        }
        Ok(())
    }
}

/// WAV / PCM / 16-bit / 16 kHz / mono.
pub const WHISPER_CAPABILITIES: AudioCapabilities = AudioCapabilities {
    formats: &[AudioFormat::Wav],
    codecs: &[AudioCodec::Pcm],
    bit_rates: &[AudioBitRate::Bits16],
    sample_rates: &[AudioSampleRate::Hz16000],
    channels: &[AudioChannels::Mono],
};

fn unsupported(field: &str, value: String) -> Error {
    Error::audio_with_context(
        format!("unsupported audio {}", field.trim_start_matches("metadata.")),
        ErrorContext::new()
            .with_field_path(field)
            .with_details(value)
            .with_source("audio_negotiation"),
    )
}

/// Wrap raw little-endian 16-bit PCM into an in-memory WAV file.
///
/// A trailing odd byte (half a sample) is dropped.
pub fn encode_wav(pcm: &[u8], metadata: &SpeechMetadata) -> Result<Vec<u8>> {
    if metadata.bit_rate != AudioBitRate::Bits16 {
        return Err(unsupported("metadata.bit_rate", metadata.bit_rate.bits().to_string()));
    }
    if pcm.len() % 2 != 0 {
        tracing::debug!(len = pcm.len(), "dropping trailing partial sample");
    }

    let spec = hound::WavSpec {
        channels: metadata.channel.count(),
        sample_rate: metadata.sample_rate.hz(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    // 44-byte canonical header plus the samples
    let mut buffer = Vec::with_capacity(pcm.len() + 44);
    {
        let mut writer = hound::WavWriter::new(Cursor::new(&mut buffer), spec).map_err(wav_error)?;
        for frame in pcm.chunks_exact(2) {
            writer
                .write_sample(i16::from_le_bytes([frame[0], frame[1]]))
                .map_err(wav_error)?;
        }
        writer.finalize().map_err(wav_error)?;
    }
    Ok(buffer)
}

fn wav_error(e: hound::Error) -> Error {
    Error::audio_with_context(
        format!("Failed to encode WAV: {}", e),
        ErrorContext::new().with_source("wav_encoder"),
    )
}
