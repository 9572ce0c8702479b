//! Transcribe a 16 kHz mono 16-bit WAV file the way the assist pipeline would.
//!
//! The file's samples are streamed to the provider in small chunks, as the
//! host does with microphone audio.
//!
//! Usage:
//!   OPENAI_API_KEY=sk-... cargo run --example transcribe_wav -- command.wav [language]
//!
//! Set `WHISPER_URL` to use another OpenAI-compatible endpoint and `RUST_LOG=debug`
//! to see request logs.

use bytes::Bytes;
use futures::stream;
use tracing_subscriber::EnvFilter;
use whisper_api_stt::audio::{
    AudioBitRate, AudioChannels, AudioCodec, AudioFormat, AudioSampleRate,
};
use whisper_api_stt::{get_engine, ProviderConfig, SpeechMetadata, SpeechResult, SpeechToTextProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or("usage: transcribe_wav <file.wav> [language]")?;
    let language = args.next().unwrap_or_else(|| "en".to_string());

    let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| "OPENAI_API_KEY not set")?;
    let mut config = ProviderConfig::new(api_key, "whisper-1", language.clone());
    if let Ok(url) = std::env::var("WHISPER_URL") {
        config = config.with_url(url);
    }
    let provider = get_engine(config)?;

    let reader = hound::WavReader::open(&path)?;
    let spec = reader.spec();
    println!(
        "{}: {} Hz, {} channel(s), {} bits",
        path, spec.sample_rate, spec.channels, spec.bits_per_sample
    );
    if spec.sample_format != hound::SampleFormat::Int {
        return Err("only integer PCM samples are supported".into());
    }

    // Describe the file as it is; the provider rejects layouts it cannot take.
    let metadata = SpeechMetadata {
        language,
        format: AudioFormat::Wav,
        codec: AudioCodec::Pcm,
        bit_rate: AudioBitRate::try_from(spec.bits_per_sample)?,
        sample_rate: AudioSampleRate::try_from(spec.sample_rate)?,
        channel: AudioChannels::try_from(spec.channels)?,
    };
    provider.check_metadata(&metadata)?;

    let pcm: Vec<u8> = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .flat_map(|s| s.to_le_bytes())
        .collect();

    let chunks: Vec<whisper_api_stt::Result<Bytes>> = pcm
        .chunks(4096)
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();

    let outcome = provider
        .process_audio_stream(&metadata, Box::pin(stream::iter(chunks)))
        .await;
    if let Err(e) = &outcome {
        eprintln!("Transcription failed: {}", e);
    }

    let result = SpeechResult::from(outcome);
    println!("{:?}: {:?}", result.state, result.text);
    Ok(())
}
