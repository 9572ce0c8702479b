//! Integration tests for error handling
//!
//! Each failure is local to one utterance: the adapter makes a single attempt
//! and keeps no state that would affect the next call.

use whisper_api_stt::stt::TranscriptionResult;
use whisper_api_stt::{get_engine, Error, ProviderConfig, SpeechMetadata, SpeechResult};

use crate::integration::mock_server::{pcm_tone, MockServerFixture, TEST_API_KEY};
use crate::integration::stub_server::{refused_endpoint, stall_first_connection};

#[tokio::test]
async fn test_unauthorized_is_remote_error() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_raw_response(
            401,
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","param":null,"code":"invalid_api_key"}}"#,
        )
        .await;

    let provider = fixture.provider("en");
    let metadata = SpeechMetadata::pcm_16khz_mono("en");
    let err = provider
        .transcribe_pcm(&metadata, &pcm_tone(100))
        .await
        .expect_err("401 must not yield text");

    match err {
        Error::Remote {
            status,
            ref class,
            ref message,
            retryable,
            ..
        } => {
            assert_eq!(status, 401);
            assert_eq!(class, "authentication");
            assert_eq!(message, "Incorrect API key provided");
            assert!(!retryable);
        }
        other => panic!("expected remote error, got {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_quota_exceeded_carries_retry_after() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error_with_retry_after(
            429,
            r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota","code":"insufficient_quota"}}"#,
            30,
        )
        .await;

    let provider = fixture.provider("en");
    let metadata = SpeechMetadata::pcm_16khz_mono("en");
    let err = provider.transcribe_pcm(&metadata, &pcm_tone(100)).await.unwrap_err();

    match err {
        Error::Remote {
            status,
            class,
            retry_after_ms,
            ..
        } => {
            assert_eq!(status, 429);
            assert_eq!(class, "quota_exhausted");
            assert_eq!(retry_after_ms, Some(30_000));
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let fixture = MockServerFixture::new().await;
    // exactly one hit: the adapter never retries on its own
    let mock = fixture.mock_raw_response(500, "upstream exploded").await;

    let provider = fixture.provider("en");
    let metadata = SpeechMetadata::pcm_16khz_mono("en");
    let err = provider.transcribe_pcm(&metadata, &pcm_tone(100)).await.unwrap_err();

    assert!(err.is_remote());
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("upstream exploded"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_body_is_protocol_error() {
    for body in [
        "not json at all",
        r#"{"transcript":"wrong field"}"#,
        r#"{"text":42}"#,
        r#"{"text":null}"#,
    ] {
        let fixture = MockServerFixture::new().await;
        let _mock = fixture.mock_raw_response(200, body).await;

        let provider = fixture.provider("en");
        let metadata = SpeechMetadata::pcm_16khz_mono("en");
        let err = provider.transcribe_pcm(&metadata, &pcm_tone(50)).await.unwrap_err();

        assert!(err.is_protocol(), "body {:?} gave {:?}", body, err);
    }
}

#[tokio::test]
async fn test_timeout_then_healthy_call_succeeds() {
    let endpoint = stall_first_connection(r#"{"text":"back online"}"#).await;
    let config = ProviderConfig::new(TEST_API_KEY, "whisper-1", "en")
        .with_url(endpoint)
        .with_timeout_ms(300);
    let provider = get_engine(config).unwrap();
    let metadata = SpeechMetadata::pcm_16khz_mono("en");

    let err = provider.transcribe_pcm(&metadata, &pcm_tone(50)).await.unwrap_err();
    assert!(err.is_connectivity(), "got {:?}", err);
    assert!(err.is_timeout());

    let transcription = provider
        .transcribe_pcm(&metadata, &pcm_tone(50))
        .await
        .expect("second call must not inherit the failed state");
    assert_eq!(transcription.text, "back online");
}

#[tokio::test]
async fn test_connection_refused_is_connectivity_error() {
    let config = ProviderConfig::new(TEST_API_KEY, "whisper-1", "en")
        .with_url(refused_endpoint())
        .with_timeout_ms(2_000);
    let provider = get_engine(config).unwrap();
    let metadata = SpeechMetadata::pcm_16khz_mono("en");

    let err = provider.transcribe_pcm(&metadata, &pcm_tone(50)).await.unwrap_err();
    assert!(err.is_connectivity(), "got {:?}", err);
    assert!(!err.is_timeout());

    let outcome: TranscriptionResult = Err(err);
    let result = SpeechResult::from(outcome);
    assert!(!result.is_success());
    assert!(result.text.is_empty());
}

#[tokio::test]
async fn test_missing_language_fails_without_network_call() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture.mock_any().await;

    let mut config = fixture.config("en");
    config.language = None;
    let err = get_engine(config).err().expect("configuration must fail");

    assert!(err.is_configuration());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_language_fails_without_network_call() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture.mock_any().await;

    for language in ["eng", "EN-US", "en,xx"] {
        let err = get_engine(fixture.config(language))
            .err()
            .expect("configuration must fail");
        assert!(err.is_configuration(), "{}: {:?}", language, err);
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_wav_header_layout_is_checked_before_upload() {
    use whisper_api_stt::audio::{AudioBitRate, AudioChannels, AudioSampleRate};
    use whisper_api_stt::SpeechToTextProvider;

    let fixture = MockServerFixture::new().await;
    let mock = fixture.mock_any().await;
    let provider = fixture.provider("en");

    // 44.1 kHz stereo, as read from a music-grade WAV header
    let mut metadata = SpeechMetadata::pcm_16khz_mono("en");
    metadata.bit_rate = AudioBitRate::try_from(16u16).unwrap();
    metadata.sample_rate = AudioSampleRate::try_from(44_100u32).unwrap();
    metadata.channel = AudioChannels::try_from(2u16).unwrap();

    let err = provider.check_metadata(&metadata).unwrap_err();
    assert!(err.is_audio(), "got {:?}", err);

    let err = provider.transcribe_pcm(&metadata, &pcm_tone(50)).await.unwrap_err();
    assert!(err.is_audio(), "got {:?}", err);
    mock.assert_async().await;
}
