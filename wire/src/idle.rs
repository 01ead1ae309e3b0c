//! The idle command layout.
//!
//! ```text
//! u8  kind (SelectIdleCmd)
//! u8  player
//! u16 padding
//! section normal summons      { u32 code, u8 controller, u8 zone, u32 slot }
//! section special summons     { u32 code, u8 controller, u8 zone, u32 slot }
//! section repositions         { u32 code, u8 controller, u8 zone, u8 slot }
//! section monster zone sets   { u32 code, u8 controller, u8 zone, u32 slot }
//! section spell/trap sets     { u32 code, u8 controller, u8 zone, u32 slot }
//! section activations         { u32 code, u8 controller, u8 zone, u32 slot,
//!                               u64 description, u8 client mode }
//! u8  can enter battle phase
//! u8  can end turn
//! u8  can shuffle
//! ```
//!
//! Every section is a `u32` count followed by that many records. The order is
//! part of the wire contract.

use bitstream::{ByteCursor, ReadMode};
use protocol::{ActionableCard, IdleCommandRequest, MessageKind};

use crate::error::{DecodeError, WireResult};
use crate::limits::Limits;
use crate::message::{check_message_len, read_kind, Decoded};
use crate::section::read_section;

const CARD_RECORD_LEN: usize = 4 + 1 + 1 + 4;
const REPOSITION_RECORD_LEN: usize = 4 + 1 + 1 + 1;
const ACTIVATION_RECORD_LEN: usize = CARD_RECORD_LEN + 8 + 1;

#[derive(Clone, Copy)]
enum SlotWidth {
    U8,
    U32,
}

/// Decodes a complete idle command message, discriminator included.
pub fn decode_idle_command(
    bytes: &[u8],
    mode: ReadMode,
    limits: &Limits,
) -> WireResult<Decoded<IdleCommandRequest>> {
    check_message_len(bytes, limits)?;
    let mut cursor = ByteCursor::new(bytes, mode);
    let kind = read_kind(&mut cursor)?;
    if kind != MessageKind::SelectIdleCmd {
        return Err(DecodeError::UnexpectedKind {
            expected: MessageKind::SelectIdleCmd,
            found: kind,
        });
    }
    let value = read_idle_body(&mut cursor, limits)?;
    Ok(Decoded {
        value,
        truncated: cursor.truncated(),
    })
}

/// Reads the idle command body; the discriminator has already been consumed.
pub(crate) fn read_idle_body(
    cursor: &mut ByteCursor<'_>,
    limits: &Limits,
) -> WireResult<IdleCommandRequest> {
    let player = cursor.read_u8()?;
    cursor.skip(2)?;

    let normal_summons = read_cards(cursor, limits, SlotWidth::U32)?;
    let special_summons = read_cards(cursor, limits, SlotWidth::U32)?;
    let repositions = read_cards(cursor, limits, SlotWidth::U8)?;
    let monster_sets = read_cards(cursor, limits, SlotWidth::U32)?;
    let spell_trap_sets = read_cards(cursor, limits, SlotWidth::U32)?;
    let activations = read_section(cursor, ACTIVATION_RECORD_LEN, limits, |c| {
        let card = read_card(c, SlotWidth::U32)?;
        let _description = c.read_u64()?;
        let _client_mode = c.read_u8()?;
        Ok(card)
    })?;

    let can_enter_battle_phase = cursor.read_u8()? == 1;
    let can_end_turn = cursor.read_u8()? == 1;
    let can_shuffle = cursor.read_u8()? == 1;

    Ok(IdleCommandRequest {
        player,
        normal_summons,
        special_summons,
        repositions,
        monster_sets,
        spell_trap_sets,
        activations,
        can_enter_battle_phase,
        can_end_turn,
        can_shuffle,
    })
}

fn read_cards(
    cursor: &mut ByteCursor<'_>,
    limits: &Limits,
    slot: SlotWidth,
) -> WireResult<Vec<ActionableCard>> {
    let record_len = match slot {
        SlotWidth::U8 => REPOSITION_RECORD_LEN,
        SlotWidth::U32 => CARD_RECORD_LEN,
    };
    read_section(cursor, record_len, limits, |c| read_card(c, slot))
}

fn read_card(cursor: &mut ByteCursor<'_>, slot: SlotWidth) -> WireResult<ActionableCard> {
    let code = cursor.read_u32()?;
    let _controller = cursor.read_u8()?;
    let zone = cursor.read_u8()?;
    let slot = match slot {
        SlotWidth::U8 => u32::from(cursor.read_u8()?),
        SlotWidth::U32 => cursor.read_u32()?,
    };
    Ok(ActionableCard { code, zone, slot })
}
