//! Session configuration.

use bitstream::ReadMode;
use wire::Limits;

/// How a session decodes the legacy messages its engine produces.
///
/// The message format itself comes from the engine; envelope decoding has no
/// tunables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionConfig {
    /// Underflow policy for legacy reads.
    pub read_mode: ReadMode,

    /// Bounds applied to legacy messages in either read mode.
    pub limits: Limits,
}

impl SessionConfig {
    /// Strict reads and small limits, so malformed fixtures fail loudly.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            read_mode: ReadMode::Strict,
            limits: Limits::for_testing(),
        }
    }

    /// Permissive reads with no message size bound (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            read_mode: ReadMode::Permissive,
            limits: Limits::unlimited(),
        }
    }

    #[must_use]
    pub const fn with_read_mode(mut self, read_mode: ReadMode) -> Self {
        self.read_mode = read_mode;
        self
    }
}
