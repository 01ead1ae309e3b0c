//! Duel creation options and card placement.

pub use protocol::location;

/// Options applied to both players when a duel is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuelOptions {
    /// Random seed as four 64-bit words.
    pub seed: [u64; 4],
    pub starting_lp: u32,
    /// Cards drawn before the first turn.
    pub starting_hand: u32,
    pub draw_per_turn: u32,
}

impl Default for DuelOptions {
    fn default() -> Self {
        Self {
            seed: [12345, 0, 0, 0],
            starting_lp: 8000,
            starting_hand: 5,
            draw_per_turn: 1,
        }
    }
}

impl DuelOptions {
    #[must_use]
    pub const fn with_seed(mut self, seed: [u64; 4]) -> Self {
        self.seed = seed;
        self
    }
}

/// One card put into the duel before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardPlacement {
    pub team: u8,
    pub duelist: u8,
    pub code: u32,
    pub controller: u8,
    /// Location bitmask (see [`location`]).
    pub location: u32,
    pub sequence: u32,
    pub position: u32,
}

impl CardPlacement {
    /// A face-down card in `team`'s main deck, controlled by that team.
    #[must_use]
    pub const fn deck(team: u8, code: u32) -> Self {
        Self {
            team,
            duelist: 0,
            code,
            controller: team,
            location: location::DECK as u32,
            sequence: 0,
            position: location::POS_FACE_DOWN,
        }
    }

    /// A face-up card in `team`'s hand.
    #[must_use]
    pub const fn hand(team: u8, code: u32) -> Self {
        Self {
            location: location::HAND as u32,
            position: location::POS_FACE_UP,
            ..Self::deck(team, code)
        }
    }
}
