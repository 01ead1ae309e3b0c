//! Message and request discriminators.

use std::fmt;

macro_rules! message_kinds {
    ($($name:ident = $value:literal,)*) => {
        /// Message type discriminator carried in the first byte of every
        /// legacy engine message.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u8)]
        pub enum MessageKind {
            $($name = $value,)*
        }

        impl MessageKind {
            /// Every known kind, in discriminator order.
            pub const ALL: &'static [MessageKind] = &[$(MessageKind::$name,)*];

            /// Parses a discriminator byte.
            #[must_use]
            pub const fn parse(raw: u8) -> Option<Self> {
                match raw {
                    $($value => Some(Self::$name),)*
                    _ => None,
                }
            }
        }
    };
}

message_kinds! {
    Retry = 1,
    Hint = 2,
    Waiting = 3,
    Start = 4,
    Win = 5,
    UpdateData = 6,
    UpdateCard = 7,
    RequestDeck = 8,
    SelectBattleCmd = 10,
    SelectIdleCmd = 11,
    SelectEffectYn = 12,
    SelectYesNo = 13,
    SelectOption = 14,
    SelectCard = 15,
    SelectChain = 16,
    SelectPlace = 18,
    SelectPosition = 19,
    SelectTribute = 20,
    SortChain = 21,
    SelectCounter = 22,
    SelectSum = 23,
    SelectDisfield = 24,
    SortCard = 25,
    SelectUnselectCard = 26,
    ConfirmDeckTop = 30,
    ConfirmCards = 31,
    ShuffleDeck = 32,
    ShuffleHand = 33,
    RefreshDeck = 34,
    SwapGraveDeck = 35,
    ShuffleSetCard = 36,
    ReverseDeck = 37,
    DeckTop = 38,
    ShuffleExtra = 39,
    NewTurn = 40,
    NewPhase = 41,
    ConfirmExtraTop = 42,
    Move = 50,
    PosChange = 53,
    Set = 54,
    Swap = 55,
    FieldDisabled = 56,
    Summoning = 60,
    Summoned = 61,
    SpSummoning = 62,
    SpSummoned = 63,
    FlipSummoning = 64,
    FlipSummoned = 65,
    Chaining = 70,
    Chained = 71,
    ChainSolving = 72,
    ChainSolved = 73,
    ChainEnd = 74,
    ChainNegated = 75,
    ChainDisabled = 76,
    CardSelected = 80,
    RandomSelected = 81,
    BecomeTarget = 83,
    Draw = 90,
    Damage = 91,
    Recover = 92,
    Equip = 93,
    LpUpdate = 94,
    Unequip = 95,
    CardTarget = 96,
    CancelTarget = 97,
    PayLpCost = 100,
    AddCounter = 101,
    RemoveCounter = 102,
    Attack = 110,
    Battle = 111,
    AttackDisabled = 112,
    DamageStepStart = 113,
    DamageStepEnd = 114,
    MissedEffect = 120,
    BeChainTarget = 121,
    CreateRelation = 122,
    ReleaseRelation = 123,
    TossCoin = 130,
    TossDice = 131,
    RockPaperScissors = 132,
    HandRes = 133,
    AnnounceRace = 140,
    AnnounceAttrib = 141,
    AnnounceCard = 142,
    AnnounceNumber = 143,
    CardHint = 160,
    TagSwap = 161,
    ReloadField = 162,
    AiName = 163,
    ShowHint = 164,
    PlayerHint = 165,
    MatchKill = 170,
    CustomMsg = 180,
    RemoveCards = 190,
}

impl MessageKind {
    /// Returns the raw discriminator byte.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Returns `true` if the engine waits for an answer after this message.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(
            self,
            Self::SelectBattleCmd
                | Self::SelectIdleCmd
                | Self::SelectEffectYn
                | Self::SelectYesNo
                | Self::SelectOption
                | Self::SelectCard
                | Self::SelectChain
                | Self::SelectPlace
                | Self::SelectPosition
                | Self::SelectTribute
                | Self::SortChain
                | Self::SelectCounter
                | Self::SelectSum
                | Self::SelectDisfield
                | Self::SortCard
                | Self::SelectUnselectCard
                | Self::RockPaperScissors
                | Self::AnnounceRace
                | Self::AnnounceAttrib
                | Self::AnnounceCard
                | Self::AnnounceNumber
        )
    }

    /// Maps a blocking kind to the request model that represents it.
    ///
    /// Returns `None` for notifications and for prompts this adapter does not
    /// model.
    #[must_use]
    pub const fn request_kind(self) -> Option<RequestKind> {
        match self {
            Self::SelectIdleCmd => Some(RequestKind::Idle),
            Self::SelectChain => Some(RequestKind::Chain),
            Self::SelectCard => Some(RequestKind::Card),
            Self::SelectYesNo => Some(RequestKind::YesNo),
            Self::SelectEffectYn => Some(RequestKind::EffectYesNo),
            Self::SelectOption => Some(RequestKind::Option),
            Self::SelectPlace | Self::SelectDisfield => Some(RequestKind::Place),
            Self::SelectPosition => Some(RequestKind::Position),
            _ => None,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}({})", self.raw())
    }
}

/// The prompts this adapter can decode and answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequestKind {
    Idle,
    Chain,
    Card,
    YesNo,
    EffectYesNo,
    Option,
    Place,
    Position,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle command",
            Self::Chain => "chain selection",
            Self::Card => "card selection",
            Self::YesNo => "yes/no",
            Self::EffectYesNo => "effect yes/no",
            Self::Option => "option",
            Self::Place => "place selection",
            Self::Position => "position selection",
        };
        write!(f, "{name}")
    }
}
