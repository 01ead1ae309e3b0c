//! Error types for legacy message decoding.

use std::fmt;

use bitstream::CursorError;
use protocol::MessageKind;

/// Result type for legacy message operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// Errors that can occur while decoding a legacy engine message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// The message has no discriminator byte.
    EmptyMessage,

    /// A strict read ran past the end of the message.
    Truncated { requested: usize, available: usize },

    /// A varint field was malformed.
    InvalidVarint,

    /// Discriminator byte is not a known message kind.
    UnknownMessageKind { kind: u8 },

    /// A decoder for one kind was handed a message of another kind.
    UnexpectedKind {
        expected: MessageKind,
        found: MessageKind,
    },

    /// The engine is blocked on a prompt this adapter does not model.
    UnsupportedRequest { kind: MessageKind },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Specific decode limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    MessageBytes,
    SectionEntries,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "empty message"),
            Self::Truncated {
                requested,
                available,
            } => {
                write!(
                    f,
                    "truncated message: need {requested} bytes, have {available}"
                )
            }
            Self::InvalidVarint => write!(f, "invalid varint"),
            Self::UnknownMessageKind { kind } => {
                write!(f, "unknown message kind: 0x{kind:02X}")
            }
            Self::UnexpectedKind { expected, found } => {
                write!(f, "expected {expected} message, found {found}")
            }
            Self::UnsupportedRequest { kind } => {
                write!(f, "unsupported request kind {kind}")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MessageBytes => "message bytes",
            Self::SectionEntries => "section entries",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for DecodeError {}

impl From<CursorError> for DecodeError {
    fn from(err: CursorError) -> Self {
        match err {
            CursorError::Truncated {
                requested,
                available,
            } => Self::Truncated {
                requested,
                available,
            },
            CursorError::InvalidVarint => Self::InvalidVarint,
        }
    }
}
