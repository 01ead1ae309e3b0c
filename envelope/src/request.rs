//! Request payloads.
//!
//! ```text
//! Request        one-of { 1 IdleRequest, 2 ChainRequest, 3 CardRequest,
//!                         4 YesNoRequest, 5 EffectYesNoRequest, 6 OptionRequest,
//!                         7 PlaceRequest, 8 PositionRequest }
//! IdleRequest    1 player, 2 normal_summons*, 3 special_summons*, 4 repositions*,
//!                5 monster_sets*, 6 spell_trap_sets*, 7 activations*,
//!                8 can_battle, 9 can_end, 10 can_shuffle
//! ActionableCard 1 code, 2 zone, 3 slot
//! CardLocation   1 controller, 2 location, 3 sequence, 4 position
//! ```

use protocol::{
    ActionableCard, CardLocation, CardSelectionRequest, ChainOption, ChainRequest,
    DecodedRequest, EffectYesNoRequest, IdleCommandRequest, OptionRequest, PlaceSelectionRequest,
    PositionSelectionRequest, SelectableCard, YesNoRequest,
};

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::field::{FieldReader, FieldWriter};

pub(crate) fn write_request(w: &mut FieldWriter, request: &DecodedRequest) {
    match request {
        DecodedRequest::Idle(idle) => w.message(1, |w| write_idle(w, idle)),
        DecodedRequest::Chain(chain) => w.message(2, |w| {
            w.varint(1, u64::from(chain.player));
            w.varint(2, u64::from(chain.special_count));
            w.bool(3, chain.forced);
            w.varint(4, u64::from(chain.hint_timing));
            w.varint(5, u64::from(chain.other_timing));
            for option in &chain.options {
                w.message(6, |w| {
                    w.varint(1, u64::from(option.code));
                    w.message(2, |w| write_location(w, option.location));
                    w.varint(3, option.description);
                });
            }
        }),
        DecodedRequest::Card(selection) => w.message(3, |w| {
            w.varint(1, u64::from(selection.player));
            w.bool(2, selection.cancelable);
            w.varint(3, u64::from(selection.min));
            w.varint(4, u64::from(selection.max));
            for card in &selection.cards {
                w.message(5, |w| {
                    w.varint(1, u64::from(card.code));
                    w.message(2, |w| write_location(w, card.location));
                });
            }
        }),
        DecodedRequest::YesNo(yes_no) => w.message(4, |w| {
            w.varint(1, u64::from(yes_no.player));
            w.varint(2, yes_no.description);
        }),
        DecodedRequest::EffectYesNo(effect) => w.message(5, |w| {
            w.varint(1, u64::from(effect.player));
            w.varint(2, u64::from(effect.code));
            w.message(3, |w| write_location(w, effect.location));
            w.varint(4, effect.description);
        }),
        DecodedRequest::Option(option) => w.message(6, |w| {
            w.varint(1, u64::from(option.player));
            w.packed(2, option.options.iter().copied());
        }),
        DecodedRequest::Place(place) => w.message(7, |w| {
            w.varint(1, u64::from(place.player));
            w.varint(2, u64::from(place.count));
            w.varint(3, u64::from(place.disabled_mask));
        }),
        DecodedRequest::Position(position) => w.message(8, |w| {
            w.varint(1, u64::from(position.player));
            w.varint(2, u64::from(position.code));
            w.varint(3, u64::from(position.positions));
        }),
    }
}

fn write_idle(w: &mut FieldWriter, idle: &IdleCommandRequest) {
    w.varint(1, u64::from(idle.player));
    let sections = [
        &idle.normal_summons,
        &idle.special_summons,
        &idle.repositions,
        &idle.monster_sets,
        &idle.spell_trap_sets,
        &idle.activations,
    ];
    for (number, section) in (2..).zip(sections) {
        for card in section {
            w.message(number, |w| {
                w.varint(1, u64::from(card.code));
                w.varint(2, u64::from(card.zone));
                w.varint(3, u64::from(card.slot));
            });
        }
    }
    w.bool(8, idle.can_enter_battle_phase);
    w.bool(9, idle.can_end_turn);
    w.bool(10, idle.can_shuffle);
}

fn write_location(w: &mut FieldWriter, location: CardLocation) {
    w.varint(1, u64::from(location.controller));
    w.varint(2, u64::from(location.location));
    w.varint(3, u64::from(location.sequence));
    w.varint(4, u64::from(location.position));
}

pub(crate) fn read_request(mut reader: FieldReader<'_>) -> EnvelopeResult<DecodedRequest> {
    let mut request = None;
    while let Some(field) = reader.next_field()? {
        let decoded = match field.number {
            1 => DecodedRequest::Idle(read_idle(field.message("IdleRequest")?)?),
            2 => DecodedRequest::Chain(read_chain(field.message("ChainRequest")?)?),
            3 => DecodedRequest::Card(read_card_selection(field.message("CardRequest")?)?),
            4 => DecodedRequest::YesNo(read_yes_no(field.message("YesNoRequest")?)?),
            5 => DecodedRequest::EffectYesNo(read_effect_yes_no(
                field.message("EffectYesNoRequest")?,
            )?),
            6 => DecodedRequest::Option(read_option(field.message("OptionRequest")?)?),
            7 => DecodedRequest::Place(read_place(field.message("PlaceRequest")?)?),
            8 => DecodedRequest::Position(read_position(field.message("PositionRequest")?)?),
            _ => return Err(field.unknown()),
        };
        if request.replace(decoded).is_some() {
            return Err(field.duplicate());
        }
    }
    request.ok_or(EnvelopeError::MissingPayload { message: "Request" })
}

fn read_idle(mut reader: FieldReader<'_>) -> EnvelopeResult<IdleCommandRequest> {
    let mut idle = IdleCommandRequest::default();
    while let Some(field) = reader.next_field()? {
        let section = match field.number {
            1 => {
                idle.player = field.u8()?;
                continue;
            }
            2 => &mut idle.normal_summons,
            3 => &mut idle.special_summons,
            4 => &mut idle.repositions,
            5 => &mut idle.monster_sets,
            6 => &mut idle.spell_trap_sets,
            7 => &mut idle.activations,
            8 => {
                idle.can_enter_battle_phase = field.bool()?;
                continue;
            }
            9 => {
                idle.can_end_turn = field.bool()?;
                continue;
            }
            10 => {
                idle.can_shuffle = field.bool()?;
                continue;
            }
            _ => return Err(field.unknown()),
        };
        section.push(read_actionable(field.message("ActionableCard")?)?);
    }
    Ok(idle)
}

fn read_actionable(mut reader: FieldReader<'_>) -> EnvelopeResult<ActionableCard> {
    let mut card = ActionableCard::default();
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => card.code = field.u32()?,
            2 => card.zone = field.u8()?,
            3 => card.slot = field.u32()?,
            _ => return Err(field.unknown()),
        }
    }
    Ok(card)
}

fn read_location(mut reader: FieldReader<'_>) -> EnvelopeResult<CardLocation> {
    let mut location = CardLocation::default();
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => location.controller = field.u8()?,
            2 => location.location = field.u8()?,
            3 => location.sequence = field.u32()?,
            4 => location.position = field.u32()?,
            _ => return Err(field.unknown()),
        }
    }
    Ok(location)
}

fn read_chain(mut reader: FieldReader<'_>) -> EnvelopeResult<ChainRequest> {
    let mut chain = ChainRequest::default();
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => chain.player = field.u8()?,
            2 => chain.special_count = field.u8()?,
            3 => chain.forced = field.bool()?,
            4 => chain.hint_timing = field.u32()?,
            5 => chain.other_timing = field.u32()?,
            6 => chain
                .options
                .push(read_chain_option(field.message("ChainOption")?)?),
            _ => return Err(field.unknown()),
        }
    }
    Ok(chain)
}

fn read_chain_option(mut reader: FieldReader<'_>) -> EnvelopeResult<ChainOption> {
    let mut option = ChainOption::default();
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => option.code = field.u32()?,
            2 => option.location = read_location(field.message("CardLocation")?)?,
            3 => option.description = field.u64()?,
            _ => return Err(field.unknown()),
        }
    }
    Ok(option)
}

fn read_card_selection(mut reader: FieldReader<'_>) -> EnvelopeResult<CardSelectionRequest> {
    let mut selection = CardSelectionRequest::default();
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => selection.player = field.u8()?,
            2 => selection.cancelable = field.bool()?,
            3 => selection.min = field.u32()?,
            4 => selection.max = field.u32()?,
            5 => {
                let mut card = SelectableCard::default();
                let mut inner = field.message("SelectableCard")?;
                while let Some(field) = inner.next_field()? {
                    match field.number {
                        1 => card.code = field.u32()?,
                        2 => card.location = read_location(field.message("CardLocation")?)?,
                        _ => return Err(field.unknown()),
                    }
                }
                selection.cards.push(card);
            }
            _ => return Err(field.unknown()),
        }
    }
    Ok(selection)
}

fn read_yes_no(mut reader: FieldReader<'_>) -> EnvelopeResult<YesNoRequest> {
    let mut request = YesNoRequest::default();
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => request.player = field.u8()?,
            2 => request.description = field.u64()?,
            _ => return Err(field.unknown()),
        }
    }
    Ok(request)
}

fn read_effect_yes_no(mut reader: FieldReader<'_>) -> EnvelopeResult<EffectYesNoRequest> {
    let mut request = EffectYesNoRequest::default();
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => request.player = field.u8()?,
            2 => request.code = field.u32()?,
            3 => request.location = read_location(field.message("CardLocation")?)?,
            4 => request.description = field.u64()?,
            _ => return Err(field.unknown()),
        }
    }
    Ok(request)
}

fn read_option(mut reader: FieldReader<'_>) -> EnvelopeResult<OptionRequest> {
    let mut request = OptionRequest::default();
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => request.player = field.u8()?,
            2 => field.push_varints(&mut request.options)?,
            _ => return Err(field.unknown()),
        }
    }
    Ok(request)
}

fn read_place(mut reader: FieldReader<'_>) -> EnvelopeResult<PlaceSelectionRequest> {
    let mut request = PlaceSelectionRequest::default();
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => request.player = field.u8()?,
            2 => request.count = field.u8()?,
            3 => request.disabled_mask = field.u32()?,
            _ => return Err(field.unknown()),
        }
    }
    Ok(request)
}

fn read_position(mut reader: FieldReader<'_>) -> EnvelopeResult<PositionSelectionRequest> {
    let mut request = PositionSelectionRequest::default();
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => request.player = field.u8()?,
            2 => request.code = field.u32()?,
            3 => request.positions = field.u8()?,
            _ => return Err(field.unknown()),
        }
    }
    Ok(request)
}
