//! Non-blocking state notifications.

use crate::kind::MessageKind;

/// Duel phases as reported by `NewPhase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum Phase {
    Draw = 0x01,
    Standby = 0x02,
    Main1 = 0x04,
    BattleStart = 0x08,
    BattleStep = 0x10,
    Damage = 0x20,
    DamageCalculation = 0x40,
    Battle = 0x80,
    Main2 = 0x100,
    End = 0x200,
}

impl Phase {
    #[must_use]
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0x01 => Some(Self::Draw),
            0x02 => Some(Self::Standby),
            0x04 => Some(Self::Main1),
            0x08 => Some(Self::BattleStart),
            0x10 => Some(Self::BattleStep),
            0x20 => Some(Self::Damage),
            0x40 => Some(Self::DamageCalculation),
            0x80 => Some(Self::Battle),
            0x100 => Some(Self::Main2),
            0x200 => Some(Self::End),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawnCard {
    pub code: u32,
    pub position: u32,
}

/// A state change reported by the engine that needs no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notification {
    NewTurn { player: u8 },
    NewPhase { phase: u16 },
    Draw { player: u8, cards: Vec<DrawnCard> },
    Damage { player: u8, amount: u32 },
    Recover { player: u8, amount: u32 },
    LpUpdate { player: u8, lp: u32 },
    Win { player: u8, reason: u8 },
    /// Any other notification, body kept verbatim (discriminator stripped).
    Other { kind: MessageKind, body: Vec<u8> },
}

impl Notification {
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::NewTurn { .. } => MessageKind::NewTurn,
            Self::NewPhase { .. } => MessageKind::NewPhase,
            Self::Draw { .. } => MessageKind::Draw,
            Self::Damage { .. } => MessageKind::Damage,
            Self::Recover { .. } => MessageKind::Recover,
            Self::LpUpdate { .. } => MessageKind::LpUpdate,
            Self::Win { .. } => MessageKind::Win,
            Self::Other { kind, .. } => *kind,
        }
    }
}
