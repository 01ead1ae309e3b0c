//! Error types for engine calls.

use std::fmt;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised at the engine boundary.
///
/// Every variant is fatal to the duel: the engine's state after a failed call
/// is not trusted, so nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    /// Handle creation failed with the engine's status code.
    CreateFailed { code: i32 },

    /// The step call returned a status outside the known set.
    UnknownStatus { raw: i32 },

    /// The handle was already released.
    Released,

    /// Operation called out of order (e.g. placing cards after start).
    OutOfOrder {
        operation: &'static str,
        reason: &'static str,
    },

    /// The engine refused a call.
    CallFailed {
        operation: &'static str,
        reason: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateFailed { code } => write!(f, "duel creation failed with status {code}"),
            Self::UnknownStatus { raw } => write!(f, "unknown step status {raw}"),
            Self::Released => write!(f, "engine handle already released"),
            Self::OutOfOrder { operation, reason } => write!(f, "{operation}: {reason}"),
            Self::CallFailed { operation, reason } => write!(f, "{operation} failed: {reason}"),
        }
    }
}

impl std::error::Error for EngineError {}
