//! Standard classes for remote transcription failures.
//!
//! A non-2xx answer from the transcription endpoint is reported as
//! [`crate::Error::Remote`] carrying the HTTP status and one of the class names
//! below. The class is derived from the provider's error code when the body
//! carries one (OpenAI-style `{"error": {"code": ..., "type": ...}}`), and from
//! the HTTP status otherwise.
//!
//! | Prefix | Category | Description                       |
//! |--------|----------|-----------------------------------|
//! | E1xxx  | client   | Request-side errors (key, audio)  |
//! | E2xxx  | rate     | Rate limit and quota errors       |
//! | E3xxx  | server   | Endpoint-side errors              |
//! | E9xxx  | unknown  | Catch-all / unclassified          |
//!
//! ## Example
//!
//! ```rust
//! use whisper_api_stt::error_code::StandardErrorCode;
//!
//! let code = StandardErrorCode::classify(429, Some("insufficient_quota"), None);
//! assert_eq!(code.name(), "quota_exhausted");
//! assert!(!code.retryable());
//! assert_eq!(code.category(), "rate");
//! ```

use std::fmt;

/// Standard error class of a remote transcription failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardErrorCode {
    /// E1001: Malformed request or audio rejected by the endpoint
    InvalidRequest,
    /// E1002: Invalid, expired, or missing API key
    Authentication,
    /// E1003: Valid credentials but insufficient permissions
    PermissionDenied,
    /// E1004: Requested model or endpoint does not exist
    NotFound,
    /// E1005: Audio file exceeds the endpoint's upload limit
    RequestTooLarge,
    /// E2001: Request rate limit exceeded
    RateLimited,
    /// E2002: Account usage quota or billing limit reached
    QuotaExhausted,
    /// E3001: Internal server error on the endpoint side
    ServerError,
    /// E3002: Endpoint temporarily overloaded or unavailable
    Overloaded,
    /// E3003: Endpoint or gateway timed out
    Timeout,
    /// E9999: Error could not be classified
    Unknown,
}

impl StandardErrorCode {
    /// Returns the canonical code string (e.g., `"E1002"`).
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "E1001",
            Self::Authentication => "E1002",
            Self::PermissionDenied => "E1003",
            Self::NotFound => "E1004",
            Self::RequestTooLarge => "E1005",
            Self::RateLimited => "E2001",
            Self::QuotaExhausted => "E2002",
            Self::ServerError => "E3001",
            Self::Overloaded => "E3002",
            Self::Timeout => "E3003",
            Self::Unknown => "E9999",
        }
    }

    /// Returns the standard class name (e.g., `"authentication"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Authentication => "authentication",
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::RequestTooLarge => "request_too_large",
            Self::RateLimited => "rate_limited",
            Self::QuotaExhausted => "quota_exhausted",
            Self::ServerError => "server_error",
            Self::Overloaded => "overloaded",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }

    /// Whether a later attempt may succeed unchanged.
    ///
    /// Advisory only: the adapter makes a single attempt and leaves re-prompting
    /// to the host pipeline.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServerError | Self::Overloaded | Self::Timeout
        )
    }

    /// Returns the category: `"client"`, `"rate"`, `"server"`, or `"unknown"`.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidRequest
            | Self::Authentication
            | Self::PermissionDenied
            | Self::NotFound
            | Self::RequestTooLarge => "client",
            Self::RateLimited | Self::QuotaExhausted => "rate",
            Self::ServerError | Self::Overloaded | Self::Timeout => "server",
            Self::Unknown => "unknown",
        }
    }

    /// Maps a provider error code/type string to the corresponding `StandardErrorCode`.
    ///
    /// Supports standard names and OpenAI-style aliases such as `"invalid_api_key"`
    /// and `"insufficient_quota"`.
    pub fn from_provider_code(provider_code: &str) -> Option<Self> {
        let code = match provider_code {
            "invalid_request" | "invalid_request_error" | "invalid_file_format" => {
                Self::InvalidRequest
            }
            "authentication" | "invalid_api_key" | "authentication_error" => Self::Authentication,
            "permission_denied" | "permission_error" => Self::PermissionDenied,
            "not_found" | "model_not_found" => Self::NotFound,
            "request_too_large" | "file_too_large" => Self::RequestTooLarge,
            "rate_limited" | "rate_limit_exceeded" => Self::RateLimited,
            "quota_exhausted" | "insufficient_quota" => Self::QuotaExhausted,
            "server_error" => Self::ServerError,
            "overloaded" | "service_unavailable" => Self::Overloaded,
            "timeout" => Self::Timeout,
            _ => return None,
        };
        Some(code)
    }

    /// Maps an HTTP status code to the most likely `StandardErrorCode`.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 | 415 | 422 => Self::InvalidRequest,
            401 => Self::Authentication,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            408 | 504 => Self::Timeout,
            413 => Self::RequestTooLarge,
            429 => Self::RateLimited,
            500 | 502 => Self::ServerError,
            503 => Self::Overloaded,
            _ => Self::Unknown,
        }
    }

    /// Classify a failed response.
    ///
    /// A recognized provider `code` wins. The error `type` is often generic
    /// (`invalid_request_error` accompanies a 401), so it is only consulted when
    /// the status itself has no standard mapping.
    pub fn classify(status: u16, code: Option<&str>, kind: Option<&str>) -> Self {
        if let Some(c) = code.and_then(Self::from_provider_code) {
            return c;
        }
        match Self::from_http_status(status) {
            Self::Unknown => kind
                .and_then(Self::from_provider_code)
                .unwrap_or(Self::Unknown),
            by_status => by_status,
        }
    }
}

impl fmt::Display for StandardErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
