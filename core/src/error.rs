//! Error types for the SquareCloud client.
//!
//! # Design
//! `Api` is the only "expected" failure: the provider answered with a non-2xx
//! status and a machine-readable `code`, and callers branch on that code.
//! `MalformedResponse` means the provider broke the envelope contract (body is
//! not JSON, or the key the call expects is missing). `Transport` covers
//! everything that happened before a response arrived.

use std::fmt;

use thiserror::Error;

/// Errors returned by every fallible client operation.
#[derive(Debug, Error)]
pub enum SquareError {
    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The body was not JSON or lacked the envelope key the call expects.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The provider returned a non-2xx status carrying an error code.
    #[error("api error {status}: {code}")]
    Api { status: u16, code: String },

    /// Client configuration was incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SquareError {
    /// The provider error code, when this is an `Api` error.
    pub fn code(&self) -> Option<&str> {
        match self {
            SquareError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    pub(crate) fn missing_key(key: &str) -> Self {
        SquareError::MalformedResponse(format!("missing `{key}` key in response body"))
    }
}

pub type Result<T> = std::result::Result<T, SquareError>;

/// Why a request failed to produce a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Connect,
    Dns,
    Timeout,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Connect => "connection failed",
            TransportErrorKind::Dns => "host not found",
            TransportErrorKind::Timeout => "timed out",
            TransportErrorKind::Other => "transport failure",
        };
        f.write_str(name)
    }
}

/// A network-level failure. Never retried.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
