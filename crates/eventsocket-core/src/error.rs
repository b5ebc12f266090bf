//! Shared error type across eventsocket crates.

use thiserror::Error;

/// Why a raw text message could not be turned into an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Neither `{` nor `[` appears anywhere in the message.
    #[error("no payload marker")]
    NoPayloadMarker,
    /// The payload marker is the first character, so there is no event name.
    #[error("empty event name")]
    EmptyEvent,
    /// The payload candidate is not a syntactically valid JSON document.
    #[error("invalid json: {0}")]
    InvalidJson(String),
    /// Outbound only: the payload does not serialize to an array or object.
    #[error("payload must be a json array or object")]
    ScalarPayload,
}

impl FormatError {
    /// Stable code used in logs and test vectors.
    pub fn code(&self) -> &'static str {
        match self {
            FormatError::NoPayloadMarker => "NO_PAYLOAD_MARKER",
            FormatError::EmptyEvent => "EMPTY_EVENT",
            FormatError::InvalidJson(_) => "INVALID_JSON",
            FormatError::ScalarPayload => "SCALAR_PAYLOAD",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, EventSocketError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum EventSocketError {
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    #[error("no listener for event: {0}")]
    UnknownEvent(String),
    #[error("invalid registration: {0}")]
    InvalidRegistration(String),
    #[error("connection #{0} is closed")]
    ConnectionClosed(u64),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl EventSocketError {
    /// Stable code, suitable for structured log fields.
    pub fn code(&self) -> &'static str {
        match self {
            EventSocketError::Format(_) => "FORMAT",
            EventSocketError::UnknownEvent(_) => "UNKNOWN_EVENT",
            EventSocketError::InvalidRegistration(_) => "INVALID_REGISTRATION",
            EventSocketError::ConnectionClosed(_) => "CONNECTION_CLOSED",
            EventSocketError::BadConfig(_) => "BAD_CONFIG",
            EventSocketError::UnsupportedVersion => "UNSUPPORTED_VERSION",
            EventSocketError::Internal(_) => "INTERNAL",
        }
    }

    /// True for per-message failures that leave the connection usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EventSocketError::Format(_) | EventSocketError::UnknownEvent(_)
        )
    }
}
