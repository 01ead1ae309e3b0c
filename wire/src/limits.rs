//! Bounds on what a legacy message may claim.

/// Limits enforced while decoding legacy messages.
///
/// Section counts come straight off the wire, so they are checked against
/// these limits before anything is allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum message size in bytes.
    pub max_message_bytes: usize,

    /// Maximum number of entries in one counted section.
    pub max_section_entries: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_message_bytes: 64 * 1024,

            // A duel never has more than a few hundred cards in play.
            max_section_entries: 512,
        }
    }
}

impl Limits {
    /// Small bounds so oversized fixtures fail fast.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_message_bytes: 4096,
            max_section_entries: 32,
        }
    }

    /// No message size bound; only for trusted captures.
    ///
    /// Section counts stay capped at [`Limits::SECTION_CEILING`], since a
    /// permissive read zero-fills every entry a count claims.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_message_bytes: usize::MAX,
            max_section_entries: Self::SECTION_CEILING,
        }
    }

    /// Largest section count any preset accepts.
    pub const SECTION_CEILING: usize = 65_535;
}
