use thiserror::Error;

/// Structured error context for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Configuration key or request field that caused the error (e.g., "config.language")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., offending value, expected range)
    pub details: Option<String>,
    /// Source of the error (e.g., "config_validator", "stt_client")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the adapter.
///
/// Every failure is local to one utterance (or, for `Configuration`, to
/// adapter initialization). Nothing here is retried by the adapter itself.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Audio error: {message}{}", format_context(.context))]
    Audio {
        message: String,
        context: ErrorContext,
    },

    #[error("Connectivity error: {message}{}", format_context(.context))]
    Connectivity {
        message: String,
        /// The request deadline elapsed before a full response arrived.
        timeout: bool,
        context: ErrorContext,
    },

    #[error("Remote error: HTTP {status} ({class}): {message}")]
    Remote {
        status: u16,
        class: String,
        message: String,
        retryable: bool,
        retry_after_ms: Option<u32>,
    },

    #[error("Protocol error: {message}{}", format_context(.context))]
    Protocol {
        message: String,
        context: ErrorContext,
    },
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn audio_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Audio {
            message: msg.into(),
            context,
        }
    }

    pub fn connectivity_with_context(
        msg: impl Into<String>,
        timeout: bool,
        context: ErrorContext,
    ) -> Self {
        Error::Connectivity {
            message: msg.into(),
            timeout,
            context,
        }
    }

    pub fn protocol_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Protocol {
            message: msg.into(),
            context,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, Error::Audio { .. })
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Connectivity { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Connectivity { timeout: true, .. })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote { .. })
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::Protocol { .. })
    }

    /// HTTP status of a remote failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. }
            | Error::Audio { context, .. }
            | Error::Connectivity { context, .. }
            | Error::Protocol { context, .. } => Some(context),
            Error::Remote { .. } => None,
        }
    }
}
