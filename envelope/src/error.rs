//! Error types for envelope decoding.

use std::fmt;

use bitstream::CursorError;

/// Result type for envelope operations.
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;

/// Ways an envelope can violate its schema.
///
/// Every variant means the whole envelope is malformed; there is no partial
/// or zero-filled recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnvelopeError {
    /// A field key, varint or length-delimited payload ran past the end.
    Truncated { requested: usize, available: usize },

    /// A varint was longer than ten bytes or overflowed.
    InvalidVarint,

    /// Field number not part of the message schema.
    UnknownField { message: &'static str, field: u64 },

    /// Field present with a wire type its schema does not allow.
    WrongWireType {
        message: &'static str,
        field: u64,
        wire_type: u8,
    },

    /// A one-of had no member set.
    MissingPayload { message: &'static str },

    /// A one-of had more than one member set.
    DuplicateOneOf { message: &'static str, field: u64 },

    /// A scalar does not fit the type it decodes into.
    ValueOutOfRange {
        message: &'static str,
        field: u64,
        value: u64,
    },

    /// An event named a discriminator outside the known message kinds.
    UnknownMessageKind { kind: u64 },
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated {
                requested,
                available,
            } => write!(
                f,
                "truncated envelope: need {requested} bytes, have {available}"
            ),
            Self::InvalidVarint => write!(f, "invalid varint"),
            Self::UnknownField { message, field } => {
                write!(f, "unknown field {field} in {message}")
            }
            Self::WrongWireType {
                message,
                field,
                wire_type,
            } => write!(f, "field {field} in {message} has wire type {wire_type}"),
            Self::MissingPayload { message } => write!(f, "{message} has no payload set"),
            Self::DuplicateOneOf { message, field } => {
                write!(f, "{message} sets field {field} after another payload")
            }
            Self::ValueOutOfRange {
                message,
                field,
                value,
            } => write!(f, "field {field} in {message} out of range: {value}"),
            Self::UnknownMessageKind { kind } => write!(f, "unknown message kind {kind}"),
        }
    }
}

impl std::error::Error for EnvelopeError {}

impl From<CursorError> for EnvelopeError {
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
