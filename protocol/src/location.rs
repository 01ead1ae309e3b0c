//! Location and position bitmasks used in card placements and requests.

pub const DECK: u8 = 0x01;
pub const HAND: u8 = 0x02;
pub const MONSTER_ZONE: u8 = 0x04;
pub const SPELL_TRAP_ZONE: u8 = 0x08;
pub const GRAVEYARD: u8 = 0x10;
pub const BANISHED: u8 = 0x20;
pub const EXTRA_DECK: u8 = 0x40;
pub const OVERLAY: u8 = 0x80;

/// Face-up in either battle position.
pub const POS_FACE_UP: u32 = 0x5;
/// Face-down in either battle position.
pub const POS_FACE_DOWN: u32 = 0xA;
