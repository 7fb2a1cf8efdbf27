//! Error types for the fetch client.
//!
//! # Design
//! `ErrorKind` is the closed set of outcomes a caller has to handle. It carries
//! no payload, only a fixed display message, so it can be matched
//! exhaustively and shown to a user as-is. The underlying cause is logged at
//! the point of classification instead of being threaded through.
//!
//! `TransportError` is the narrower vocabulary a `Transport` uses to report a
//! failed exchange; the executor folds it into an `ErrorKind`.

use std::fmt;

use thiserror::Error;

/// Why an `execute` call did not produce a decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The URL string could not be parsed. Nothing was sent.
    InvalidUrl,

    /// The transport failed to complete the exchange (DNS, connect, TLS, ...).
    RequestFailed,

    /// The response body did not match the requested shape.
    DecodingFailed,

    /// No complete response arrived before the timeout.
    Timeout,

    /// A failure that fits none of the other kinds.
    Unknown,
}

impl ErrorKind {
    /// Human-readable message for this kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::InvalidUrl => "Invalid URL",
            ErrorKind::RequestFailed => "Request Failed",
            ErrorKind::DecodingFailed => "Error while decoding data",
            ErrorKind::Timeout => "Request timed out",
            ErrorKind::Unknown => "Unknown Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl std::error::Error for ErrorKind {}

/// Failure reported by a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The transport gave up waiting on its own timer.
    #[error("transport timed out")]
    Timeout,

    /// A recognized network failure: DNS, connect, TLS, body read, redirect.
    #[error("transport failed: {0}")]
    Failed(String),

    /// Anything the transport could not attribute to the network.
    #[error("transport error: {0}")]
    Other(String),
}

impl From<TransportError> for ErrorKind {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => ErrorKind::Timeout,
            TransportError::Failed(_) => ErrorKind::RequestFailed,
            TransportError::Other(_) => ErrorKind::Unknown,
        }
    }
}

/// Classify a `serde_json` failure.
///
/// Syntax, data, and premature-EOF errors all mean the payload is not the
/// requested shape. An I/O error cannot come from an in-memory slice, so it
/// lands in `Unknown`.
pub(crate) fn classify_decode(err: &serde_json::Error) -> ErrorKind {
    use serde_json::error::Category;

    match err.classify() {
        Category::Syntax | Category::Data | Category::Eof => ErrorKind::DecodingFailed,
        Category::Io => ErrorKind::Unknown,
    }
}
