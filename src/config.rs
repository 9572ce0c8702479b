//! Provider configuration.
//!
//! [`ProviderConfig`] mirrors the block the host platform declares for this
//! adapter. Every field is optional at the serde level so that a missing key is
//! reported as a [`crate::Error::Configuration`] rather than a parse failure.
//! [`ProviderConfig::validate`] turns it into [`ProviderSettings`], which is all
//! the runtime ever sees.

use crate::language::LanguageList;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Identifier the host uses to select this adapter.
pub const PLATFORM: &str = "whisper_api_stt";

pub const OPENAI_TRANSCRIPTIONS_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Raw, host-declared configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// OpenAI-compatible transcription endpoint; defaults to OpenAI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl ProviderConfig {
    /// Parse a YAML config block, e.g. one entry of the host's `stt:` list.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                format!("Failed to parse configuration: {}", e),
                ErrorContext::new().with_source("config_loader"),
            )
        })
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| {
            Error::configuration_with_context(
                format!("Failed to parse configuration: {}", e),
                ErrorContext::new().with_source("config_loader"),
            )
        })
    }

    /// Convenience constructor for the four required keys.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            platform: Some(PLATFORM.to_string()),
            api_key: Some(api_key.into()),
            model: Some(model.into()),
            language: Some(language.into()),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Check that the `platform` key selects this adapter.
    pub fn validate_platform(&self) -> Result<()> {
        match self.platform.as_deref().map(str::trim) {
            Some(PLATFORM) => Ok(()),
            Some(other) => Err(Error::configuration_with_context(
                format!("platform '{}' does not select this adapter", other),
                field("platform").with_details(format!("expected '{}'", PLATFORM)),
            )),
            None => Err(missing("platform")),
        }
    }

    /// Validate into runtime settings. No network access happens here.
    pub fn validate(self) -> Result<ProviderSettings> {
        let languages = match self.language.as_deref() {
            Some(raw) => LanguageList::parse(raw)?,
            None => return Err(missing("language")),
        };

        let api_key = required_text(self.api_key, "api_key")?;
        let model = required_text(self.model, "model")?;

        let endpoint = match self.url.as_deref().map(str::trim) {
            None | Some("") => Url::parse(OPENAI_TRANSCRIPTIONS_URL)
                .map_err(|e| Error::configuration(format!("Invalid default endpoint: {}", e)))?,
            Some(raw) => parse_endpoint(raw)?,
        };

        if let Some(t) = self.temperature {
            if !t.is_finite() || !(0.0..=1.0).contains(&t) {
                return Err(Error::configuration_with_context(
                    "temperature must be between 0.0 and 1.0",
                    field("temperature").with_details(t.to_string()),
                ));
            }
        }

        let timeout_ms = self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(Error::configuration_with_context(
                "timeout_ms must be greater than zero",
                field("timeout_ms"),
            ));
        }

        let prompt = self.prompt.filter(|p| !p.trim().is_empty());

        Ok(ProviderSettings {
            api_key: ApiKey(api_key),
            model,
            languages,
            endpoint,
            prompt,
            temperature: self.temperature,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("platform", &self.platform)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("language", &self.language)
            .field("url", &self.url)
            .field("prompt", &self.prompt)
            .field("temperature", &self.temperature)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: ApiKey,
    pub model: String,
    pub languages: LanguageList,
    pub endpoint: Url,
    pub prompt: Option<String>,
    pub temperature: Option<f32>,
    pub timeout: Duration,
}

/// Static bearer credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid endpoint url: {}", e),
            field("url").with_details(raw),
        )
    })?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(Error::configuration_with_context(
            "endpoint url must be an absolute http(s) url",
            field("url").with_details(raw),
        )),
    }
}

fn required_text(value: Option<String>, key: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(missing(key)),
    }
}

fn field(key: &str) -> ErrorContext {
    ErrorContext::new()
        .with_field_path(format!("config.{}", key))
        .with_source("config_validator")
}

fn missing(key: &str) -> Error {
    Error::configuration_with_context(format!("{} is required", key), field(key))
}
