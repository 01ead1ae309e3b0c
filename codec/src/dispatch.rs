//! Routing raw engine buffers to the codec for their format.

use bitstream::ReadMode;
use engine::{MessageFormat, RawMessage};
use protocol::{Answer, Message, Notification};
use wire::Decoded;

use crate::config::SessionConfig;
use crate::error::DecodeError;

/// Decodes one raw message with the codec its format calls for.
///
/// Envelope messages are never partially read, so their `truncated` flag is
/// always `false`.
pub fn decode_raw(
    raw: &RawMessage,
    config: &SessionConfig,
) -> Result<Decoded<Message>, DecodeError> {
    match raw.format {
        MessageFormat::Legacy => {
            Ok(wire::decode_message(&raw.bytes, config.read_mode, &config.limits)?)
        }
        MessageFormat::Envelope => {
            let value = envelope::decode_envelope(&raw.bytes)?;
            Ok(Decoded {
                value,
                truncated: false,
            })
        }
    }
}

/// What a permissive session keeps from a message it could not decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Salvaged {
    /// A known notification kind, passed on with its body unparsed.
    Opaque(Notification),
    /// The discriminator is unknown; nothing can be kept.
    Dropped,
}

/// Decides whether a legacy decode failure can be stepped over.
///
/// Only permissive reads of non-blocking messages qualify. Blocking kinds,
/// empty buffers, limit violations and envelope messages stay fatal.
pub(crate) fn salvage(
    raw: &RawMessage,
    err: &DecodeError,
    config: &SessionConfig,
) -> Option<Salvaged> {
    if config.read_mode != ReadMode::Permissive || raw.format != MessageFormat::Legacy {
        return None;
    }
    let DecodeError::Legacy(err) = err else {
        return None;
    };
    if matches!(err, wire::DecodeError::LimitsExceeded { .. }) {
        return None;
    }
    match wire::peek_kind(&raw.bytes) {
        Err(wire::DecodeError::UnknownMessageKind { .. }) => Some(Salvaged::Dropped),
        Ok(kind) if !kind.is_blocking() => Some(Salvaged::Opaque(Notification::Other {
            kind,
            body: raw.bytes[1..].to_vec(),
        })),
        _ => None,
    }
}

/// Encodes an answer in the format the engine reads.
#[must_use]
pub fn encode_answer(answer: &Answer, format: MessageFormat) -> Vec<u8> {
    match format {
        MessageFormat::Legacy => wire::encode_response(answer),
        MessageFormat::Envelope => envelope::encode_answer(answer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::{DecodedRequest, YesNoRequest};

    fn raw(format: MessageFormat, bytes: Vec<u8>) -> RawMessage {
        RawMessage { format, bytes }
    }

    #[test]
    fn legacy_and_envelope_agree() {
        let message = Message::Request(DecodedRequest::YesNo(YesNoRequest {
            player: 1,
            description: 77,
        }));
        let config = SessionConfig::default();

        let legacy = raw(MessageFormat::Legacy, wire::encode_message(&message));
        let structured = raw(MessageFormat::Envelope, envelope::encode_envelope(&message));

        assert_eq!(decode_raw(&legacy, &config).unwrap().value, message);
        assert_eq!(decode_raw(&structured, &config).unwrap().value, message);
    }

    #[test]
    fn envelope_errors_are_malformed() {
        let garbage = raw(MessageFormat::Envelope, vec![0xFF]);
        let err = decode_raw(&garbage, &SessionConfig::default()).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedEnvelope(_)));
    }

    #[test]
    fn legacy_errors_keep_their_kind() {
        let empty = raw(MessageFormat::Legacy, Vec::new());
        let err = decode_raw(&empty, &SessionConfig::default()).unwrap_err();
        assert_eq!(err, DecodeError::Legacy(wire::DecodeError::EmptyMessage));
    }

    #[test]
    fn notification_through_legacy() {
        let message = Message::Notification(Notification::NewTurn { player: 0 });
        let bytes = wire::encode_message(&message);
        let decoded = decode_raw(&raw(MessageFormat::Legacy, bytes), &SessionConfig::default())
            .unwrap();
        assert_eq!(decoded.value, message);
        assert!(!decoded.truncated);
    }

    #[test]
    fn unknown_kind_is_dropped_only_when_permissive() {
        let unknown = raw(MessageFormat::Legacy, vec![17, 0, 0]);
        let permissive = SessionConfig::default().with_read_mode(ReadMode::Permissive);
        let err = decode_raw(&unknown, &permissive).unwrap_err();
        assert_eq!(salvage(&unknown, &err, &permissive), Some(Salvaged::Dropped));
        assert_eq!(salvage(&unknown, &err, &SessionConfig::for_testing()), None);
    }

    #[test]
    fn blocking_and_empty_messages_stay_fatal() {
        let permissive = SessionConfig::default().with_read_mode(ReadMode::Permissive);
        let battle = raw(
            MessageFormat::Legacy,
            vec![protocol::MessageKind::SelectBattleCmd.raw(), 0],
        );
        let err = decode_raw(&battle, &permissive).unwrap_err();
        assert_eq!(salvage(&battle, &err, &permissive), None);

        let empty = raw(MessageFormat::Legacy, Vec::new());
        let err = decode_raw(&empty, &permissive).unwrap_err();
        assert_eq!(salvage(&empty, &err, &permissive), None);
    }

    #[test]
    fn known_notification_is_kept_opaque() {
        let permissive = SessionConfig::default().with_read_mode(ReadMode::Permissive);
        let draw = raw(
            MessageFormat::Legacy,
            vec![protocol::MessageKind::Draw.raw(), 0, 1, 0, 0, 0],
        );
        let err = DecodeError::Legacy(wire::DecodeError::InvalidVarint);
        assert_eq!(
            salvage(&draw, &err, &permissive),
            Some(Salvaged::Opaque(Notification::Other {
                kind: protocol::MessageKind::Draw,
                body: vec![0, 1, 0, 0, 0],
            }))
        );
    }

    #[test]
    fn envelope_failures_are_never_salvaged() {
        let garbage = raw(MessageFormat::Envelope, vec![0xFF]);
        let permissive = SessionConfig::default().with_read_mode(ReadMode::Permissive);
        let err = decode_raw(&garbage, &permissive).unwrap_err();
        assert_eq!(salvage(&garbage, &err, &permissive), None);
    }

    #[test]
    fn answers_follow_format() {
        let answer = Answer::SelectYesNo { yes: true };
        assert_eq!(
            encode_answer(&answer, MessageFormat::Legacy),
            wire::encode_response(&answer)
        );
        assert_eq!(
            encode_answer(&answer, MessageFormat::Envelope),
            envelope::encode_answer(&answer)
        );
    }
}
