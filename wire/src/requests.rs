//! Layouts of the blocking prompts other than the idle command.

use bitstream::ByteCursor;
use protocol::{
    CardSelectionRequest, ChainOption, ChainRequest, EffectYesNoRequest, OptionRequest,
    PlaceSelectionRequest, PositionSelectionRequest, SelectableCard, YesNoRequest,
};

use crate::error::WireResult;
use crate::limits::Limits;
use crate::section::{read_location, read_records, read_section, LOCATION_LEN};

const CHAIN_RECORD_LEN: usize = 4 + LOCATION_LEN + 8 + 1;
const CARD_RECORD_LEN: usize = 4 + LOCATION_LEN;
const OPTION_RECORD_LEN: usize = 8;

pub(crate) fn read_chain(cursor: &mut ByteCursor<'_>, limits: &Limits) -> WireResult<ChainRequest> {
    let player = cursor.read_u8()?;
    let special_count = cursor.read_u8()?;
    let forced = cursor.read_u8()? != 0;
    let hint_timing = cursor.read_u32()?;
    let other_timing = cursor.read_u32()?;
    let options = read_section(cursor, CHAIN_RECORD_LEN, limits, |c| {
        let code = c.read_u32()?;
        let location = read_location(c)?;
        let description = c.read_u64()?;
        let _client_mode = c.read_u8()?;
        Ok(ChainOption {
            code,
            location,
            description,
        })
    })?;
    Ok(ChainRequest {
        player,
        special_count,
        forced,
        hint_timing,
        other_timing,
        options,
    })
}

pub(crate) fn read_card_selection(
    cursor: &mut ByteCursor<'_>,
    limits: &Limits,
) -> WireResult<CardSelectionRequest> {
    let player = cursor.read_u8()?;
    let cancelable = cursor.read_u8()? != 0;
    let min = cursor.read_u32()?;
    let max = cursor.read_u32()?;
    let cards = read_section(cursor, CARD_RECORD_LEN, limits, |c| {
        Ok(SelectableCard {
            code: c.read_u32()?,
            location: read_location(c)?,
        })
    })?;
    Ok(CardSelectionRequest {
        player,
        cancelable,
        min,
        max,
        cards,
    })
}

pub(crate) fn read_yes_no(cursor: &mut ByteCursor<'_>) -> WireResult<YesNoRequest> {
    Ok(YesNoRequest {
        player: cursor.read_u8()?,
        description: cursor.read_u64()?,
    })
}

pub(crate) fn read_effect_yes_no(cursor: &mut ByteCursor<'_>) -> WireResult<EffectYesNoRequest> {
    Ok(EffectYesNoRequest {
        player: cursor.read_u8()?,
        code: cursor.read_u32()?,
        location: read_location(cursor)?,
        description: cursor.read_u64()?,
    })
}

pub(crate) fn read_option(cursor: &mut ByteCursor<'_>, limits: &Limits) -> WireResult<OptionRequest> {
    let player = cursor.read_u8()?;
    let count = usize::from(cursor.read_u8()?);
    let options = read_records(cursor, count, OPTION_RECORD_LEN, limits, |c| {
        Ok(c.read_u64()?)
    })?;
    Ok(OptionRequest { player, options })
}

pub(crate) fn read_place(cursor: &mut ByteCursor<'_>) -> WireResult<PlaceSelectionRequest> {
    Ok(PlaceSelectionRequest {
        player: cursor.read_u8()?,
        count: cursor.read_u8()?,
        disabled_mask: cursor.read_u32()?,
    })
}

pub(crate) fn read_position(cursor: &mut ByteCursor<'_>) -> WireResult<PositionSelectionRequest> {
    Ok(PositionSelectionRequest {
        player: cursor.read_u8()?,
        code: cursor.read_u32()?,
        positions: cursor.read_u8()?,
    })
}
