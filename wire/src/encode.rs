//! Legacy message encoding.
//!
//! The inverse of [`decode_message`](crate::decode_message) for every modelled
//! kind. Fields the decoder drops (controllers of idle cards, activation
//! descriptors, client modes, padding) are written as the request's player or
//! zero. Used by the scripted engine and by tests.

use bitstream::ByteWriter;
use protocol::{
    ActionableCard, CardLocation, DecodedRequest, IdleCommandRequest, Message, MessageKind,
    Notification,
};

pub fn encode_message(message: &Message) -> Vec<u8> {
    match message {
        Message::Request(request) => encode_request(request),
        Message::Notification(notification) => encode_notification(notification),
    }
}

pub fn encode_request(request: &DecodedRequest) -> Vec<u8> {
    let mut w = ByteWriter::new();
    match request {
        DecodedRequest::Idle(idle) => {
            w.write_u8(MessageKind::SelectIdleCmd.raw());
            write_idle(&mut w, idle);
        }
        DecodedRequest::Chain(chain) => {
            w.write_u8(MessageKind::SelectChain.raw());
            w.write_u8(chain.player);
            w.write_u8(chain.special_count);
            w.write_u8(u8::from(chain.forced));
            w.write_u32(chain.hint_timing);
            w.write_u32(chain.other_timing);
            write_count(&mut w, chain.options.len());
            for option in &chain.options {
                w.write_u32(option.code);
                write_location(&mut w, option.location);
                w.write_u64(option.description);
                w.write_u8(0);
            }
        }
        DecodedRequest::Card(selection) => {
            w.write_u8(MessageKind::SelectCard.raw());
            w.write_u8(selection.player);
            w.write_u8(u8::from(selection.cancelable));
            w.write_u32(selection.min);
            w.write_u32(selection.max);
            write_count(&mut w, selection.cards.len());
            for card in &selection.cards {
                w.write_u32(card.code);
                write_location(&mut w, card.location);
            }
        }
        DecodedRequest::YesNo(yes_no) => {
            w.write_u8(MessageKind::SelectYesNo.raw());
            w.write_u8(yes_no.player);
            w.write_u64(yes_no.description);
        }
        DecodedRequest::EffectYesNo(effect) => {
            w.write_u8(MessageKind::SelectEffectYn.raw());
            w.write_u8(effect.player);
            w.write_u32(effect.code);
            write_location(&mut w, effect.location);
            w.write_u64(effect.description);
        }
        DecodedRequest::Option(option) => {
            w.write_u8(MessageKind::SelectOption.raw());
            w.write_u8(option.player);
            let count = option.options.len().min(usize::from(u8::MAX));
            w.write_u8(u8::try_from(count).unwrap_or(u8::MAX));
            for description in &option.options[..count] {
                w.write_u64(*description);
            }
        }
        DecodedRequest::Place(place) => {
            w.write_u8(MessageKind::SelectPlace.raw());
            w.write_u8(place.player);
            w.write_u8(place.count);
            w.write_u32(place.disabled_mask);
        }
        DecodedRequest::Position(position) => {
            w.write_u8(MessageKind::SelectPosition.raw());
            w.write_u8(position.player);
            w.write_u32(position.code);
            w.write_u8(position.positions);
        }
    }
    w.finish()
}

pub fn encode_notification(notification: &Notification) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_u8(notification.kind().raw());
    match notification {
        Notification::NewTurn { player } => w.write_u8(*player),
        Notification::NewPhase { phase } => w.write_u16(*phase),
        Notification::Draw { player, cards } => {
            w.write_u8(*player);
            write_count(&mut w, cards.len());
            for card in cards {
                w.write_u32(card.code);
                w.write_u32(card.position);
            }
        }
        Notification::Damage { player, amount } | Notification::Recover { player, amount } => {
            w.write_u8(*player);
            w.write_u32(*amount);
        }
        Notification::LpUpdate { player, lp } => {
            w.write_u8(*player);
            w.write_u32(*lp);
        }
        Notification::Win { player, reason } => {
            w.write_u8(*player);
            w.write_u8(*reason);
        }
        Notification::Other { body, .. } => w.write_bytes(body),
    }
    w.finish()
}

fn write_idle(w: &mut ByteWriter, idle: &IdleCommandRequest) {
    w.write_u8(idle.player);
    w.write_u16(0);
    for (section, narrow) in [
        (&idle.normal_summons, false),
        (&idle.special_summons, false),
        (&idle.repositions, true),
        (&idle.monster_sets, false),
        (&idle.spell_trap_sets, false),
    ] {
        write_count(w, section.len());
        for card in section {
            write_card(w, idle.player, card, narrow);
        }
    }
    write_count(w, idle.activations.len());
    for card in &idle.activations {
        write_card(w, idle.player, card, false);
        w.write_u64(0);
        w.write_u8(0);
    }
    w.write_u8(u8::from(idle.can_enter_battle_phase));
    w.write_u8(u8::from(idle.can_end_turn));
    w.write_u8(u8::from(idle.can_shuffle));
}

fn write_card(w: &mut ByteWriter, controller: u8, card: &ActionableCard, narrow_slot: bool) {
    w.write_u32(card.code);
    w.write_u8(controller);
    w.write_u8(card.zone);
    if narrow_slot {
        w.write_u8(u8::try_from(card.slot).unwrap_or(u8::MAX));
    } else {
        w.write_u32(card.slot);
    }
}

fn write_location(w: &mut ByteWriter, location: CardLocation) {
    w.write_u8(location.controller);
    w.write_u8(location.location);
    w.write_u32(location.sequence);
    w.write_u32(location.position);
}

fn write_count(w: &mut ByteWriter, len: usize) {
    w.write_u32(u32::try_from(len).unwrap_or(u32::MAX));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_message, Limits};
    use bitstream::ReadMode;
    use protocol::{location, OptionRequest};

    #[test]
    fn idle_layout_matches_decoder() {
        let idle = IdleCommandRequest {
            player: 1,
            normal_summons: vec![ActionableCard::new(4031, location::MONSTER_ZONE, 0)],
            repositions: vec![ActionableCard::new(77, location::MONSTER_ZONE, 4)],
            activations: vec![ActionableCard::new(88, location::SPELL_TRAP_ZONE, 2)],
            can_end_turn: true,
            ..IdleCommandRequest::default()
        };
        let message = Message::Request(DecodedRequest::Idle(idle));
        let bytes = encode_message(&message);
        // kind, player, padding, 6 counts, 3 records, 3 flags
        assert_eq!(bytes.len(), 1 + 1 + 2 + 6 * 4 + 10 + 7 + 19 + 3);
        let decoded = decode_message(&bytes, ReadMode::Strict, &Limits::default()).unwrap();
        assert!(!decoded.truncated);
        assert_eq!(decoded.value, message);
    }

    #[test]
    fn option_count_saturates() {
        let option = OptionRequest {
            player: 0,
            options: (0..300).collect(),
        };
        let bytes = encode_request(&DecodedRequest::Option(option));
        assert_eq!(bytes[2], u8::MAX);
        assert_eq!(bytes.len(), 3 + 255 * 8);
    }

    #[test]
    fn other_notification_keeps_body() {
        let notification = Notification::Other {
            kind: MessageKind::Move,
            body: vec![1, 2, 3],
        };
        assert_eq!(
            encode_notification(&notification),
            vec![MessageKind::Move.raw(), 1, 2, 3]
        );
    }
}
