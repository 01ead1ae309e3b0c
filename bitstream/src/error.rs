//! Error types for cursor operations.

use std::fmt;

/// Result type for cursor operations.
pub type CursorResult<T> = Result<T, CursorError>;

/// Errors that can occur while reading little-endian byte data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// Attempted to read past the end of the buffer in strict mode.
    Truncated {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// A varint ran longer than its target width allows.
    InvalidVarint,
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes but only {available} bytes available"
                )
            }
            Self::InvalidVarint => write!(f, "invalid varint"),
        }
    }
}

impl std::error::Error for CursorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_names_both_sizes() {
        let err = CursorError::Truncated {
            requested: 4,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "attempted to read 4 bytes but only 3 bytes available"
        );
    }

    #[test]
    fn invalid_varint_display() {
        assert_eq!(CursorError::InvalidVarint.to_string(), "invalid varint");
    }

    #[test]
    fn boxes_as_std_error() {
        let boxed: Box<dyn std::error::Error> = Box::new(CursorError::Truncated {
            requested: 8,
            available: 0,
        });
        assert!(boxed.source().is_none());
    }
}
