//! Typed answers to blocking requests.

use std::fmt;

use crate::kind::RequestKind;

/// Card actions offered by an idle command, numbered as the engine expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum IdleAction {
    NormalSummon = 0,
    SpecialSummon = 1,
    Reposition = 2,
    MonsterSet = 3,
    SpellTrapSet = 4,
    Activate = 5,
}

impl IdleAction {
    #[must_use]
    pub const fn from_raw(raw: u64) -> Option<Self> {
        match raw {
            0 => Some(Self::NormalSummon),
            1 => Some(Self::SpecialSummon),
            2 => Some(Self::Reposition),
            3 => Some(Self::MonsterSet),
            4 => Some(Self::SpellTrapSet),
            5 => Some(Self::Activate),
            _ => None,
        }
    }
}

/// Phase transitions offered by an idle command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhaseTransition {
    Battle,
    End,
}

/// Battle positions, as the engine's bitmask values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CardPosition {
    FaceUpAttack = 0x1,
    FaceDownAttack = 0x2,
    FaceUpDefense = 0x4,
    FaceDownDefense = 0x8,
}

impl CardPosition {
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_raw(raw: u64) -> Option<Self> {
        match raw {
            0x1 => Some(Self::FaceUpAttack),
            0x2 => Some(Self::FaceDownAttack),
            0x4 => Some(Self::FaceUpDefense),
            0x8 => Some(Self::FaceDownDefense),
            _ => None,
        }
    }
}

/// One zone picked in answer to a place selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceChoice {
    pub player: u8,
    pub location: u8,
    pub sequence: u8,
}

/// A caller's answer to exactly one pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Answer {
    /// Act on entry `index` of the idle section named by `action`. The
    /// legacy response packs the index into the high half of one word.
    SelectIdleAction { action: IdleAction, index: u16 },
    SelectPhase { phase: PhaseTransition },
    /// Decline to chain.
    SelectChainNoOp,
    SelectChain { index: u32 },
    /// Legacy responses carry one byte per index.
    SelectCards { indices: Vec<u8> },
    SelectYesNo { yes: bool },
    SelectOption { index: u32 },
    SelectPlaces { places: Vec<PlaceChoice> },
    SelectPosition { position: CardPosition },
}

impl Answer {
    /// The request kind this answer is primarily shaped for.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        match self {
            Self::SelectIdleAction { .. } | Self::SelectPhase { .. } => RequestKind::Idle,
            Self::SelectChainNoOp | Self::SelectChain { .. } => RequestKind::Chain,
            Self::SelectCards { .. } => RequestKind::Card,
            Self::SelectYesNo { .. } => RequestKind::YesNo,
            Self::SelectOption { .. } => RequestKind::Option,
            Self::SelectPlaces { .. } => RequestKind::Place,
            Self::SelectPosition { .. } => RequestKind::Position,
        }
    }

    /// Returns `true` if this answer can be submitted for a request of `kind`.
    ///
    /// Yes/no answers cover both plain and effect yes/no prompts.
    #[must_use]
    pub const fn answers(&self, kind: RequestKind) -> bool {
        match (self.kind(), kind) {
            (RequestKind::YesNo, RequestKind::YesNo | RequestKind::EffectYesNo) => true,
            (mine, theirs) => mine as u8 == theirs as u8,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectIdleAction { action, index } => write!(f, "idle {action:?} #{index}"),
            Self::SelectPhase { phase } => write!(f, "go to {phase:?} phase"),
            Self::SelectChainNoOp => write!(f, "no chain"),
            Self::SelectChain { index } => write!(f, "chain #{index}"),
            Self::SelectCards { indices } => write!(f, "cards {indices:?}"),
            Self::SelectYesNo { yes } => write!(f, "{}", if *yes { "yes" } else { "no" }),
            Self::SelectOption { index } => write!(f, "option #{index}"),
            Self::SelectPlaces { places } => write!(f, "{} place(s)", places.len()),
            Self::SelectPosition { position } => write!(f, "position {position:?}"),
        }
    }
}
