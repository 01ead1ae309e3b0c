//! Decoded prompts that block the engine until answered.

use crate::kind::RequestKind;

/// A card the player may act on from an idle command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionableCard {
    pub code: u32,
    /// Location bitmask (see [`crate::location`]).
    pub zone: u8,
    /// Sequence within the zone. Repositions carry it as a single byte on the
    /// legacy wire; it is widened here.
    pub slot: u32,
}

impl ActionableCard {
    #[must_use]
    pub const fn new(code: u32, zone: u8, slot: u32) -> Self {
        Self { code, zone, slot }
    }
}

/// The open-ended main phase prompt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdleCommandRequest {
    pub player: u8,
    pub normal_summons: Vec<ActionableCard>,
    pub special_summons: Vec<ActionableCard>,
    pub repositions: Vec<ActionableCard>,
    pub monster_sets: Vec<ActionableCard>,
    pub spell_trap_sets: Vec<ActionableCard>,
    pub activations: Vec<ActionableCard>,
    pub can_enter_battle_phase: bool,
    pub can_end_turn: bool,
    pub can_shuffle: bool,
}

impl IdleCommandRequest {
    /// Returns the section an [`IdleAction`](crate::IdleAction) indexes into.
    #[must_use]
    pub fn section(&self, action: crate::IdleAction) -> &[ActionableCard] {
        use crate::IdleAction;
        match action {
            IdleAction::NormalSummon => &self.normal_summons,
            IdleAction::SpecialSummon => &self.special_summons,
            IdleAction::Reposition => &self.repositions,
            IdleAction::MonsterSet => &self.monster_sets,
            IdleAction::SpellTrapSet => &self.spell_trap_sets,
            IdleAction::Activate => &self.activations,
        }
    }
}

/// Full location of a card on the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardLocation {
    pub controller: u8,
    pub location: u8,
    pub sequence: u32,
    pub position: u32,
}

/// An effect that may be chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainOption {
    pub code: u32,
    pub location: CardLocation,
    pub description: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainRequest {
    pub player: u8,
    pub special_count: u8,
    /// When set, declining to chain is not allowed.
    pub forced: bool,
    pub hint_timing: u32,
    pub other_timing: u32,
    pub options: Vec<ChainOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectableCard {
    pub code: u32,
    pub location: CardLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardSelectionRequest {
    pub player: u8,
    pub cancelable: bool,
    pub min: u32,
    pub max: u32,
    pub cards: Vec<SelectableCard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YesNoRequest {
    pub player: u8,
    pub description: u64,
}

/// "Activate this effect?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectYesNoRequest {
    pub player: u8,
    pub code: u32,
    pub location: CardLocation,
    pub description: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionRequest {
    pub player: u8,
    pub options: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceSelectionRequest {
    pub player: u8,
    /// Number of zones to pick.
    pub count: u8,
    /// Zones that may not be picked.
    pub disabled_mask: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionSelectionRequest {
    pub player: u8,
    pub code: u32,
    /// Bitmask of allowed [`CardPosition`](crate::CardPosition) values.
    pub positions: u8,
}

/// A prompt the engine is blocked on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodedRequest {
    Idle(IdleCommandRequest),
    Chain(ChainRequest),
    Card(CardSelectionRequest),
    YesNo(YesNoRequest),
    EffectYesNo(EffectYesNoRequest),
    Option(OptionRequest),
    Place(PlaceSelectionRequest),
    Position(PositionSelectionRequest),
}

impl DecodedRequest {
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        match self {
            Self::Idle(_) => RequestKind::Idle,
            Self::Chain(_) => RequestKind::Chain,
            Self::Card(_) => RequestKind::Card,
            Self::YesNo(_) => RequestKind::YesNo,
            Self::EffectYesNo(_) => RequestKind::EffectYesNo,
            Self::Option(_) => RequestKind::Option,
            Self::Place(_) => RequestKind::Place,
            Self::Position(_) => RequestKind::Position,
        }
    }

    /// The player who has to answer.
    #[must_use]
    pub const fn player(&self) -> u8 {
        match self {
            Self::Idle(r) => r.player,
            Self::Chain(r) => r.player,
            Self::Card(r) => r.player,
            Self::YesNo(r) => r.player,
            Self::EffectYesNo(r) => r.player,
            Self::Option(r) => r.player,
            Self::Place(r) => r.player,
            Self::Position(r) => r.player,
        }
    }
}
