//! Notification layouts.

use bitstream::ByteCursor;
use protocol::{DrawnCard, MessageKind, Notification};

use crate::error::WireResult;
use crate::limits::Limits;
use crate::section::read_section;

const DRAWN_CARD_LEN: usize = 8;

/// Reads a notification body; kinds without a typed model keep their bytes.
pub(crate) fn read_notification(
    kind: MessageKind,
    cursor: &mut ByteCursor<'_>,
    limits: &Limits,
) -> WireResult<Notification> {
    let notification = match kind {
        MessageKind::NewTurn => Notification::NewTurn {
            player: cursor.read_u8()?,
        },
        MessageKind::NewPhase => Notification::NewPhase {
            phase: cursor.read_u16()?,
        },
        MessageKind::Draw => {
            let player = cursor.read_u8()?;
            let cards = read_section(cursor, DRAWN_CARD_LEN, limits, |c| {
                Ok(DrawnCard {
                    code: c.read_u32()?,
                    position: c.read_u32()?,
                })
            })?;
            Notification::Draw { player, cards }
        }
        MessageKind::Damage => Notification::Damage {
            player: cursor.read_u8()?,
            amount: cursor.read_u32()?,
        },
        MessageKind::Recover => Notification::Recover {
            player: cursor.read_u8()?,
            amount: cursor.read_u32()?,
        },
        MessageKind::LpUpdate => Notification::LpUpdate {
            player: cursor.read_u8()?,
            lp: cursor.read_u32()?,
        },
        MessageKind::Win => Notification::Win {
            player: cursor.read_u8()?,
            reason: cursor.read_u8()?,
        },
        _ => Notification::Other {
            kind,
            body: cursor.read_rest().to_vec(),
        },
    };
    Ok(notification)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_layout() {
        let mut bytes = vec![1];
        bytes.extend_from_slice(&1000u32.to_le_bytes());
        let mut cursor = ByteCursor::strict(&bytes);
        let n = read_notification(MessageKind::Damage, &mut cursor, &Limits::default()).unwrap();
        assert_eq!(
            n,
            Notification::Damage {
                player: 1,
                amount: 1000
            }
        );
    }

    #[test]
    fn draw_layout() {
        let mut bytes = vec![0];
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&69_140_098u32.to_le_bytes());
        bytes.extend_from_slice(&0xAu32.to_le_bytes());
        let mut cursor = ByteCursor::strict(&bytes);
        let n = read_notification(MessageKind::Draw, &mut cursor, &Limits::default()).unwrap();
        assert_eq!(
            n,
            Notification::Draw {
                player: 0,
                cards: vec![DrawnCard {
                    code: 69_140_098,
                    position: 0xA
                }],
            }
        );
    }

    #[test]
    fn untyped_kinds_keep_body() {
        let bytes = [9, 8, 7];
        let mut cursor = ByteCursor::strict(&bytes);
        let n = read_notification(MessageKind::Move, &mut cursor, &Limits::default()).unwrap();
        assert_eq!(
            n,
            Notification::Other {
                kind: MessageKind::Move,
                body: vec![9, 8, 7]
            }
        );
        assert!(cursor.is_empty());
    }
}
