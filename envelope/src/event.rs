//! Event payloads, one per notification variant.

use protocol::{DrawnCard, MessageKind, Notification};

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::field::{FieldReader, FieldWriter};

pub(crate) fn write_event(w: &mut FieldWriter, notification: &Notification) {
    match notification {
        Notification::NewTurn { player } => w.message(1, |w| w.varint(1, u64::from(*player))),
        Notification::NewPhase { phase } => w.message(2, |w| w.varint(1, u64::from(*phase))),
        Notification::Draw { player, cards } => w.message(3, |w| {
            w.varint(1, u64::from(*player));
            for card in cards {
                w.message(2, |w| {
                    w.varint(1, u64::from(card.code));
                    w.varint(2, u64::from(card.position));
                });
            }
        }),
        Notification::Damage { player, amount } => w.message(4, |w| {
            w.varint(1, u64::from(*player));
            w.varint(2, u64::from(*amount));
        }),
        Notification::Recover { player, amount } => w.message(5, |w| {
            w.varint(1, u64::from(*player));
            w.varint(2, u64::from(*amount));
        }),
        Notification::LpUpdate { player, lp } => w.message(6, |w| {
            w.varint(1, u64::from(*player));
            w.varint(2, u64::from(*lp));
        }),
        Notification::Win { player, reason } => w.message(7, |w| {
            w.varint(1, u64::from(*player));
            w.varint(2, u64::from(*reason));
        }),
        Notification::Other { kind, body } => w.message(8, |w| {
            w.varint(1, u64::from(kind.raw()));
            w.bytes(2, body);
        }),
    }
}

pub(crate) fn read_event(mut reader: FieldReader<'_>) -> EnvelopeResult<Notification> {
    let mut event = None;
    while let Some(field) = reader.next_field()? {
        let decoded = match field.number {
            1 => {
                let [player, _] = read_pair(field.message("NewTurn")?, 1)?;
                Notification::NewTurn {
                    player: narrow(player, "NewTurn", 1)?,
                }
            }
            2 => {
                let [phase, _] = read_pair(field.message("NewPhase")?, 1)?;
                Notification::NewPhase {
                    phase: u16::try_from(phase).map_err(|_| EnvelopeError::ValueOutOfRange {
                        message: "NewPhase",
                        field: 1,
                        value: phase,
                    })?,
                }
            }
            3 => read_draw(field.message("Draw")?)?,
            4 => {
                let (player, amount) = read_player_amount(field.message("Damage")?, "Damage")?;
                Notification::Damage { player, amount }
            }
            5 => {
                let (player, amount) = read_player_amount(field.message("Recover")?, "Recover")?;
                Notification::Recover { player, amount }
            }
            6 => {
                let (player, lp) = read_player_amount(field.message("LpUpdate")?, "LpUpdate")?;
                Notification::LpUpdate { player, lp }
            }
            7 => {
                let [player, reason] = read_pair(field.message("Win")?, 2)?;
                Notification::Win {
                    player: narrow(player, "Win", 1)?,
                    reason: narrow(reason, "Win", 2)?,
                }
            }
            8 => read_other(field.message("Other")?)?,
            _ => return Err(field.unknown()),
        };
        if event.replace(decoded).is_some() {
            return Err(field.duplicate());
        }
    }
    event.ok_or(EnvelopeError::MissingPayload { message: "Event" })
}

/// Reads a message made of up to two varint fields numbered 1 and 2.
fn read_pair(mut reader: FieldReader<'_>, fields: u64) -> EnvelopeResult<[u64; 2]> {
    let mut values = [0; 2];
    while let Some(field) = reader.next_field()? {
        match field.number {
            n @ 1..=2 if n <= fields => values[(n - 1) as usize] = field.u64()?,
            _ => return Err(field.unknown()),
        }
    }
    Ok(values)
}

fn read_player_amount(reader: FieldReader<'_>, message: &'static str) -> EnvelopeResult<(u8, u32)> {
    let [player, amount] = read_pair(reader, 2)?;
    let amount = u32::try_from(amount).map_err(|_| EnvelopeError::ValueOutOfRange {
        message,
        field: 2,
        value: amount,
    })?;
    Ok((narrow(player, message, 1)?, amount))
}

fn narrow(value: u64, message: &'static str, field: u64) -> EnvelopeResult<u8> {
    u8::try_from(value).map_err(|_| EnvelopeError::ValueOutOfRange {
        message,
        field,
        value,
    })
}

fn read_draw(mut reader: FieldReader<'_>) -> EnvelopeResult<Notification> {
    let mut player = 0;
    let mut cards = Vec::new();
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => player = field.u8()?,
            2 => {
                let mut card = DrawnCard::default();
                let mut inner = field.message("DrawnCard")?;
                while let Some(field) = inner.next_field()? {
                    match field.number {
                        1 => card.code = field.u32()?,
                        2 => card.position = field.u32()?,
                        _ => return Err(field.unknown()),
                    }
                }
                cards.push(card);
            }
            _ => return Err(field.unknown()),
        }
    }
    Ok(Notification::Draw { player, cards })
}

fn read_other(mut reader: FieldReader<'_>) -> EnvelopeResult<Notification> {
    let mut kind = 0;
    let mut body = Vec::new();
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => kind = field.u64()?,
            2 => body = field.bytes()?.to_vec(),
            _ => return Err(field.unknown()),
        }
    }
    let kind = u8::try_from(kind)
        .ok()
        .and_then(MessageKind::parse)
        .ok_or(EnvelopeError::UnknownMessageKind { kind })?;
    Ok(Notification::Other { kind, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(notification: &Notification) -> Notification {
        let mut w = FieldWriter::new();
        write_event(&mut w, notification);
        let bytes = w.finish();
        read_event(FieldReader::new("Event", &bytes)).unwrap()
    }

    #[test]
    fn typed_events_roundtrip() {
        for notification in [
            Notification::NewTurn { player: 1 },
            Notification::NewPhase { phase: 0x200 },
            Notification::Damage {
                player: 0,
                amount: 1000,
            },
            Notification::Win {
                player: 1,
                reason: 4,
            },
            Notification::Draw {
                player: 0,
                cards: vec![DrawnCard {
                    code: 4031,
                    position: 0xA,
                }],
            },
        ] {
            assert_eq!(roundtrip(&notification), notification);
        }
    }

    #[test]
    fn other_keeps_kind_and_body() {
        let notification = Notification::Other {
            kind: MessageKind::Move,
            body: vec![1, 2, 3],
        };
        assert_eq!(roundtrip(&notification), notification);
    }

    #[test]
    fn other_with_unknown_kind() {
        // Event.other { kind = 17 }
        let bytes = [0x42, 0x02, 0x08, 0x11];
        assert_eq!(
            read_event(FieldReader::new("Event", &bytes)).unwrap_err(),
            EnvelopeError::UnknownMessageKind { kind: 17 }
        );
    }

    #[test]
    fn new_turn_rejects_second_field() {
        // Event.new_turn { field 2 = 1 }
        let bytes = [0x0A, 0x02, 0x10, 0x01];
        assert_eq!(
            read_event(FieldReader::new("Event", &bytes)).unwrap_err(),
            EnvelopeError::UnknownField {
                message: "NewTurn",
                field: 2
            }
        );
    }
}
