use bitstream::ReadMode;
use proptest::prelude::*;
use protocol::{location, ActionableCard, DecodedRequest, IdleCommandRequest};
use wire::{decode_idle_command, encode_request, Limits};

fn card(max_slot: u32) -> impl Strategy<Value = ActionableCard> {
    (any::<u32>(), any::<u8>(), 0..=max_slot)
        .prop_map(|(code, zone, slot)| ActionableCard::new(code, zone, slot))
}

fn section(max_slot: u32) -> impl Strategy<Value = Vec<ActionableCard>> {
    prop::collection::vec(card(max_slot), 0..8)
}

fn idle_strategy() -> impl Strategy<Value = IdleCommandRequest> {
    (
        0u8..=1,
        [
            section(u32::MAX),
            section(u32::MAX),
            section(u32::from(u8::MAX)),
            section(u32::MAX),
            section(u32::MAX),
            section(u32::MAX),
        ],
        any::<[bool; 3]>(),
    )
        .prop_map(|(player, sections, flags)| {
            let [normal, special, reposition, monster, spell_trap, activation] = sections;
            IdleCommandRequest {
                player,
                normal_summons: normal,
                special_summons: special,
                repositions: reposition,
                monster_sets: monster,
                spell_trap_sets: spell_trap,
                activations: activation,
                can_enter_battle_phase: flags[0],
                can_end_turn: flags[1],
                can_shuffle: flags[2],
            }
        })
}

fn encode(idle: &IdleCommandRequest) -> Vec<u8> {
    encode_request(&DecodedRequest::Idle(idle.clone()))
}

/// Offset of the activation count within an encoded idle command.
fn activations_offset(idle: &IdleCommandRequest) -> usize {
    let head = IdleCommandRequest {
        activations: Vec::new(),
        ..idle.clone()
    };
    encode(&head).len() - 4 - 3
}

fn same_leading_sections(a: &IdleCommandRequest, b: &IdleCommandRequest) -> bool {
    a.player == b.player
        && a.normal_summons == b.normal_summons
        && a.special_summons == b.special_summons
        && a.repositions == b.repositions
        && a.monster_sets == b.monster_sets
        && a.spell_trap_sets == b.spell_trap_sets
}

proptest! {
    #[test]
    fn prop_sections_decode_in_order(idle in idle_strategy()) {
        let bytes = encode(&idle);
        let decoded = decode_idle_command(&bytes, ReadMode::Strict, &Limits::default()).unwrap();
        prop_assert!(!decoded.truncated);
        prop_assert_eq!(decoded.value, idle);
    }

    #[test]
    fn prop_tail_truncation_keeps_earlier_sections(
        idle in idle_strategy(),
        cut in any::<prop::sample::Index>(),
    ) {
        let bytes = encode(&idle);
        let start = activations_offset(&idle);
        let cut = start + cut.index(bytes.len() - start);

        let decoded =
            decode_idle_command(&bytes[..cut], ReadMode::Permissive, &Limits::default()).unwrap();
        prop_assert!(decoded.truncated);
        prop_assert!(same_leading_sections(&decoded.value, &idle));
        if cut >= start + 4 {
            prop_assert_eq!(decoded.value.activations.len(), idle.activations.len());
        }
    }
}

#[test]
fn missing_tail_entries_are_zero_filled() {
    let idle = IdleCommandRequest {
        player: 1,
        normal_summons: vec![ActionableCard::new(4031, location::MONSTER_ZONE, 0)],
        activations: vec![
            ActionableCard::new(11, location::HAND, 0),
            ActionableCard::new(22, location::HAND, 1),
            ActionableCard::new(33, location::HAND, 2),
        ],
        can_enter_battle_phase: true,
        can_end_turn: true,
        ..IdleCommandRequest::default()
    };
    let bytes = encode(&idle);
    // Keep the count and the first activation record only.
    let cut = activations_offset(&idle) + 4 + 19;

    let decoded =
        decode_idle_command(&bytes[..cut], ReadMode::Permissive, &Limits::default()).unwrap();
    assert!(decoded.truncated);
    let value = decoded.value;
    assert_eq!(value.normal_summons, idle.normal_summons);
    assert_eq!(
        value.activations,
        vec![
            ActionableCard::new(11, location::HAND, 0),
            ActionableCard::default(),
            ActionableCard::default(),
        ]
    );
    assert!(!value.can_enter_battle_phase);
    assert!(!value.can_end_turn);
}

#[test]
fn strict_mode_rejects_the_same_input() {
    let idle = IdleCommandRequest {
        activations: vec![ActionableCard::new(11, location::HAND, 0); 2],
        ..IdleCommandRequest::default()
    };
    let bytes = encode(&idle);
    let cut = activations_offset(&idle) + 4 + 19;
    let err = decode_idle_command(&bytes[..cut], ReadMode::Strict, &Limits::default()).unwrap_err();
    assert!(matches!(err, wire::DecodeError::Truncated { .. }));
}
