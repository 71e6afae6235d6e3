//! Shared error type across RESMA crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Buffer too short, tag unrecognized, or bytes that are neither an
    /// envelope nor legacy JSON.
    FormatError,
    /// Tag recognized but the payload is internally corrupt.
    DecodeError,
    /// Input value contains a construct the codec cannot represent.
    EncodeError,
    /// Body exceeds the configured limit.
    PayloadTooLarge,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses and metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::FormatError => "FORMAT_ERROR",
            ClientCode::DecodeError => "DECODE_ERROR",
            ClientCode::EncodeError => "ENCODE_ERROR",
            ClientCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ResmaError>;

/// Unified error type used by the core and the gateway.
///
/// Format/Decode/Encode mirror the failure taxonomy of the envelope pipeline;
/// both are recoverable by callers (reject the message or row, keep going).
#[derive(Debug, Error)]
pub enum ResmaError {
    #[error("format error: {0}")]
    Format(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("internal: {0}")]
    Internal(String),
}

impl ResmaError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            ResmaError::Format(_) => ClientCode::FormatError,
            ResmaError::Decode(_) => ClientCode::DecodeError,
            ResmaError::Encode(_) => ClientCode::EncodeError,
            ResmaError::PayloadTooLarge => ClientCode::PayloadTooLarge,
            ResmaError::Internal(_) => ClientCode::Internal,
        }
    }
}
