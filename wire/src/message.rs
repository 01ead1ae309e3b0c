//! Discriminator dispatch for complete legacy messages.

use bitstream::{ByteCursor, ReadMode};
use protocol::{DecodedRequest, Message, MessageKind, RequestKind};

use crate::error::{DecodeError, LimitKind, WireResult};
use crate::idle::read_idle_body;
use crate::limits::Limits;
use crate::notifications::read_notification;
use crate::requests;

/// A decoded value plus whether any read ran past the end of the input.
///
/// `truncated` is only ever set in [`ReadMode::Permissive`]; the missing
/// fields were zero-filled and callers may choose to discard the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub value: T,
    pub truncated: bool,
}

impl<T> Decoded<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            truncated: self.truncated,
        }
    }
}

pub(crate) fn check_message_len(bytes: &[u8], limits: &Limits) -> WireResult<()> {
    if bytes.len() > limits.max_message_bytes {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::MessageBytes,
            limit: limits.max_message_bytes,
            actual: bytes.len(),
        });
    }
    Ok(())
}

/// Reads the discriminator. A missing byte is an error in both modes.
pub(crate) fn read_kind(cursor: &mut ByteCursor<'_>) -> WireResult<MessageKind> {
    if cursor.is_empty() {
        return Err(DecodeError::EmptyMessage);
    }
    let raw = cursor.read_u8()?;
    MessageKind::parse(raw).ok_or(DecodeError::UnknownMessageKind { kind: raw })
}

/// Returns the discriminator of a message without decoding its body.
pub fn peek_kind(bytes: &[u8]) -> WireResult<MessageKind> {
    let raw = *bytes.first().ok_or(DecodeError::EmptyMessage)?;
    MessageKind::parse(raw).ok_or(DecodeError::UnknownMessageKind { kind: raw })
}

/// Classifies a message by its discriminator.
///
/// Returns `Ok(None)` for notifications and `UnsupportedRequest` for blocking
/// prompts that have no request model.
pub fn request_kind(bytes: &[u8]) -> WireResult<Option<RequestKind>> {
    let kind = peek_kind(bytes)?;
    match kind.request_kind() {
        Some(request) => Ok(Some(request)),
        None if kind.is_blocking() => Err(DecodeError::UnsupportedRequest { kind }),
        None => Ok(None),
    }
}

/// Decodes one complete legacy message.
pub fn decode_message(bytes: &[u8], mode: ReadMode, limits: &Limits) -> WireResult<Decoded<Message>> {
    check_message_len(bytes, limits)?;
    let mut cursor = ByteCursor::new(bytes, mode);
    let kind = read_kind(&mut cursor)?;
    let value = read_body(kind, &mut cursor, limits)?;
    Ok(Decoded {
        value,
        truncated: cursor.truncated(),
    })
}

fn read_body(kind: MessageKind, cursor: &mut ByteCursor<'_>, limits: &Limits) -> WireResult<Message> {
    let request = match kind {
        MessageKind::SelectIdleCmd => DecodedRequest::Idle(read_idle_body(cursor, limits)?),
        MessageKind::SelectChain => DecodedRequest::Chain(requests::read_chain(cursor, limits)?),
        MessageKind::SelectCard => {
            DecodedRequest::Card(requests::read_card_selection(cursor, limits)?)
        }
        MessageKind::SelectYesNo => DecodedRequest::YesNo(requests::read_yes_no(cursor)?),
        MessageKind::SelectEffectYn => {
            DecodedRequest::EffectYesNo(requests::read_effect_yes_no(cursor)?)
        }
        MessageKind::SelectOption => DecodedRequest::Option(requests::read_option(cursor, limits)?),
        MessageKind::SelectPlace | MessageKind::SelectDisfield => {
            DecodedRequest::Place(requests::read_place(cursor)?)
        }
        MessageKind::SelectPosition => DecodedRequest::Position(requests::read_position(cursor)?),
        _ if kind.is_blocking() => return Err(DecodeError::UnsupportedRequest { kind }),
        _ => return Ok(Message::Notification(read_notification(kind, cursor, limits)?)),
    };
    Ok(Message::Request(request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::{Notification, YesNoRequest};

    #[test]
    fn empty_message() {
        assert_eq!(
            decode_message(&[], ReadMode::Permissive, &Limits::default()),
            Err(DecodeError::EmptyMessage)
        );
        assert_eq!(peek_kind(&[]), Err(DecodeError::EmptyMessage));
    }

    #[test]
    fn unknown_discriminator() {
        assert_eq!(
            decode_message(&[17, 0], ReadMode::Permissive, &Limits::default()),
            Err(DecodeError::UnknownMessageKind { kind: 17 })
        );
    }

    #[test]
    fn oversized_message() {
        let bytes = vec![MessageKind::Hint.raw(); 5000];
        let err = decode_message(&bytes, ReadMode::Permissive, &Limits::for_testing()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::MessageBytes,
                actual: 5000,
                ..
            }
        ));
    }

    #[test]
    fn request_kind_classification() {
        assert_eq!(
            request_kind(&[MessageKind::SelectIdleCmd.raw()]),
            Ok(Some(RequestKind::Idle))
        );
        assert_eq!(
            request_kind(&[MessageKind::SelectDisfield.raw()]),
            Ok(Some(RequestKind::Place))
        );
        assert_eq!(request_kind(&[MessageKind::Draw.raw()]), Ok(None));
        assert_eq!(
            request_kind(&[MessageKind::SelectSum.raw()]),
            Err(DecodeError::UnsupportedRequest {
                kind: MessageKind::SelectSum
            })
        );
    }

    #[test]
    fn unsupported_blocking_kind() {
        let err = decode_message(
            &[MessageKind::AnnounceCard.raw(), 0],
            ReadMode::Permissive,
            &Limits::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnsupportedRequest {
                kind: MessageKind::AnnounceCard
            }
        );
    }

    #[test]
    fn yes_no_dispatch() {
        let mut bytes = vec![MessageKind::SelectYesNo.raw(), 1];
        bytes.extend_from_slice(&1234u64.to_le_bytes());
        let decoded = decode_message(&bytes, ReadMode::Strict, &Limits::default()).unwrap();
        assert_eq!(
            decoded.value,
            Message::Request(DecodedRequest::YesNo(YesNoRequest {
                player: 1,
                description: 1234
            }))
        );
    }

    #[test]
    fn truncated_notification_is_flagged() {
        let decoded = decode_message(
            &[MessageKind::Damage.raw(), 1, 0xE8],
            ReadMode::Permissive,
            &Limits::default(),
        )
        .unwrap();
        assert!(decoded.truncated);
        assert_eq!(
            decoded.value,
            Message::Notification(Notification::Damage {
                player: 1,
                amount: 0
            })
        );
    }

    #[test]
    fn map_keeps_flag() {
        let decoded = Decoded {
            value: 2,
            truncated: true,
        };
        let mapped = decoded.map(|v| v * 10);
        assert_eq!(mapped.value, 20);
        assert!(mapped.truncated);
    }
}
