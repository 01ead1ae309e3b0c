//! Error types for session operations.

use std::fmt;

use engine::EngineError;
use envelope::EnvelopeError;
use protocol::RequestKind;

use crate::session::SessionState;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// A raw message that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Legacy layout error (strict-mode truncation, unknown kind, limits).
    Legacy(wire::DecodeError),

    /// Structured envelope that violates its schema.
    MalformedEnvelope(EnvelopeError),
}

/// Why a session stopped accepting calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    Engine(EngineError),
    Decode(DecodeError),
    /// The engine reported it was waiting for an answer but no request was
    /// decoded from the step.
    RequestMissing,
}

/// Errors returned by [`DuelSession`](crate::DuelSession) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Operation not legal in the current state; nothing changed.
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// The answer is for another kind of request; nothing changed.
    AnswerKindMismatch {
        expected: RequestKind,
        found: RequestKind,
    },

    /// The answer picks an entry the pending request does not offer, or more
    /// entries than it allows; nothing changed.
    AnswerOutOfRange { index: usize, available: usize },

    /// The duel is over.
    Ended,

    /// An earlier call faulted the session.
    Faulted { cause: Fault },

    /// An engine call failed; the session is now faulted.
    Engine(EngineError),

    /// A message could not be decoded; the session is now faulted.
    Decode(DecodeError),

    /// The engine is blocked but sent nothing to answer; the session is now
    /// faulted.
    RequestMissing,

    /// The session worker thread is gone.
    Disconnected,
}

impl From<Fault> for SessionError {
    fn from(fault: Fault) -> Self {
        match fault {
            Fault::Engine(err) => Self::Engine(err),
            Fault::Decode(err) => Self::Decode(err),
            Fault::RequestMissing => Self::RequestMissing,
        }
    }
}

impl From<wire::DecodeError> for DecodeError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Legacy(err)
    }
}

impl From<EnvelopeError> for DecodeError {
    fn from(err: EnvelopeError) -> Self {
        Self::MalformedEnvelope(err)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy(err) => write!(f, "legacy message: {err}"),
            Self::MalformedEnvelope(err) => write!(f, "malformed envelope: {err}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Legacy(err) => Some(err),
            Self::MalformedEnvelope(err) => Some(err),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine(err) => write!(f, "engine error: {err}"),
            Self::Decode(err) => write!(f, "decode error: {err}"),
            Self::RequestMissing => write!(f, "engine awaits an answer but sent no request"),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState { operation, state } => {
                write!(f, "{operation} is not allowed while {state}")
            }
            Self::AnswerKindMismatch { expected, found } => {
                write!(f, "expected an answer to a {expected} request, got {found}")
            }
            Self::AnswerOutOfRange { index, available } => {
                write!(f, "answer picks entry {index} of {available}")
            }
            Self::Ended => write!(f, "duel has ended"),
            Self::Faulted { cause } => write!(f, "session faulted: {cause}"),
            Self::Engine(err) => write!(f, "engine error: {err}"),
            Self::Decode(err) => write!(f, "decode error: {err}"),
            Self::RequestMissing => write!(f, "engine awaits an answer but sent no request"),
            Self::Disconnected => write!(f, "session worker disconnected"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Engine(err) | Self::Faulted { cause: Fault::Engine(err) } => Some(err),
            Self::Decode(err) | Self::Faulted { cause: Fault::Decode(err) } => Some(err),
            _ => None,
        }
    }
}
