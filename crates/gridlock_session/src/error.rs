//! Protocol and transport error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Inbound text or user input that the protocol cannot accept.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ProtocolError {
    /// A well-formed message with a `type` this protocol does not speak.
    #[display("Unknown message type: {}", _0)]
    UnknownType(String),

    /// Not JSON, no `type`, or a payload that does not fit its type.
    #[display("Malformed message: {}", _0)]
    Malformed(String),

    /// The join code was blank.
    #[display("Enter a code to join")]
    EmptyCode,

    /// The join code has the wrong length or alphabet.
    #[display("Invalid session code: {}", _0)]
    InvalidCode(String),
}

impl std::error::Error for ProtocolError {}

/// Transport error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Transport error: {} at {}:{}", message, file, line)]
pub struct TransportError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl TransportError {
    /// Creates a new transport error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
