//! Answer payloads.
//!
//! ```text
//! Answer one-of { 1 IdleAction { 1 action, 2 index }, 2 IdlePhase { 1 phase },
//!                 3 ChainNoOp {}, 4 Chain { 1 index }, 5 Cards { 1 indices (packed) },
//!                 6 YesNo { 1 yes }, 7 Option { 1 index },
//!                 8 Places { 1 Place* { 1 player, 2 location, 3 sequence } },
//!                 9 Position { 1 position } }
//! ```

use protocol::{Answer, CardPosition, IdleAction, PhaseTransition, PlaceChoice};

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::field::{FieldReader, FieldWriter};

const PHASE_BATTLE: u64 = 0;
const PHASE_END: u64 = 1;

pub(crate) fn write_answer(w: &mut FieldWriter, answer: &Answer) {
    match answer {
        Answer::SelectIdleAction { action, index } => w.message(1, |w| {
            w.varint(1, u64::from(*action as u8));
            w.varint(2, u64::from(*index));
        }),
        Answer::SelectPhase { phase } => w.message(2, |w| {
            w.varint(
                1,
                match phase {
                    PhaseTransition::Battle => PHASE_BATTLE,
                    PhaseTransition::End => PHASE_END,
                },
            );
        }),
        Answer::SelectChainNoOp => w.message(3, |_| {}),
        Answer::SelectChain { index } => w.message(4, |w| w.varint(1, u64::from(*index))),
        Answer::SelectCards { indices } => {
            w.message(5, |w| w.packed(1, indices.iter().map(|i| u64::from(*i))));
        }
        Answer::SelectYesNo { yes } => w.message(6, |w| w.bool(1, *yes)),
        Answer::SelectOption { index } => w.message(7, |w| w.varint(1, u64::from(*index))),
        Answer::SelectPlaces { places } => w.message(8, |w| {
            for place in places {
                w.message(1, |w| {
                    w.varint(1, u64::from(place.player));
                    w.varint(2, u64::from(place.location));
                    w.varint(3, u64::from(place.sequence));
                });
            }
        }),
        Answer::SelectPosition { position } => {
            w.message(9, |w| w.varint(1, u64::from(position.raw())));
        }
    }
}

pub(crate) fn read_answer(mut reader: FieldReader<'_>) -> EnvelopeResult<Answer> {
    let mut answer = None;
    while let Some(field) = reader.next_field()? {
        let decoded = match field.number {
            1 => read_idle_action(field.message("IdleAction")?)?,
            2 => {
                let mut phase = PhaseTransition::Battle;
                let mut inner = field.message("IdlePhase")?;
                while let Some(field) = inner.next_field()? {
                    match field.number {
                        1 => {
                            phase = field.enumerated(|raw| match raw {
                                PHASE_BATTLE => Some(PhaseTransition::Battle),
                                PHASE_END => Some(PhaseTransition::End),
                                _ => None,
                            })?;
                        }
                        _ => return Err(field.unknown()),
                    }
                }
                Answer::SelectPhase { phase }
            }
            3 => {
                let mut inner = field.message("ChainNoOp")?;
                if let Some(field) = inner.next_field()? {
                    return Err(field.unknown());
                }
                Answer::SelectChainNoOp
            }
            4 => Answer::SelectChain {
                index: read_index(field.message("Chain")?)?,
            },
            5 => {
                let mut raw = Vec::new();
                let mut inner = field.message("Cards")?;
                while let Some(field) = inner.next_field()? {
                    match field.number {
                        1 => field.push_varints(&mut raw)?,
                        _ => return Err(field.unknown()),
                    }
                }
                let indices = raw
                    .into_iter()
                    .map(|value| {
                        u8::try_from(value).map_err(|_| EnvelopeError::ValueOutOfRange {
                            message: "Cards",
                            field: 1,
                            value,
                        })
                    })
                    .collect::<EnvelopeResult<_>>()?;
                Answer::SelectCards { indices }
            }
            6 => {
                let mut yes = false;
                let mut inner = field.message("YesNo")?;
                while let Some(field) = inner.next_field()? {
                    match field.number {
                        1 => yes = field.bool()?,
                        _ => return Err(field.unknown()),
                    }
                }
                Answer::SelectYesNo { yes }
            }
            7 => Answer::SelectOption {
                index: read_index(field.message("Option")?)?,
            },
            8 => read_places(field.message("Places")?)?,
            9 => read_position(field.message("Position")?)?,
            _ => return Err(field.unknown()),
        };
        if answer.replace(decoded).is_some() {
            return Err(field.duplicate());
        }
    }
    answer.ok_or(EnvelopeError::MissingPayload { message: "Answer" })
}

fn read_idle_action(mut reader: FieldReader<'_>) -> EnvelopeResult<Answer> {
    let mut action = IdleAction::NormalSummon;
    let mut index = 0;
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => action = field.enumerated(IdleAction::from_raw)?,
            2 => index = field.u16()?,
            _ => return Err(field.unknown()),
        }
    }
    Ok(Answer::SelectIdleAction { action, index })
}

fn read_index(mut reader: FieldReader<'_>) -> EnvelopeResult<u32> {
    let mut index = 0;
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => index = field.u32()?,
            _ => return Err(field.unknown()),
        }
    }
    Ok(index)
}

fn read_places(mut reader: FieldReader<'_>) -> EnvelopeResult<Answer> {
    let mut places = Vec::new();
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => {
                let mut place = PlaceChoice::default();
                let mut inner = field.message("Place")?;
                while let Some(field) = inner.next_field()? {
                    match field.number {
                        1 => place.player = field.u8()?,
                        2 => place.location = field.u8()?,
                        3 => place.sequence = field.u8()?,
                        _ => return Err(field.unknown()),
                    }
                }
                places.push(place);
            }
            _ => return Err(field.unknown()),
        }
    }
    Ok(Answer::SelectPlaces { places })
}

fn read_position(mut reader: FieldReader<'_>) -> EnvelopeResult<Answer> {
    let mut raw = 0;
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => raw = field.u64()?,
            _ => return Err(field.unknown()),
        }
    }
    let position = CardPosition::from_raw(raw).ok_or(EnvelopeError::ValueOutOfRange {
        message: "Position",
        field: 1,
        value: raw,
    })?;
    Ok(Answer::SelectPosition { position })
}
