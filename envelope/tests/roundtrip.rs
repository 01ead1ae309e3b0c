use envelope::{decode_answer, decode_envelope, encode_answer, encode_envelope, EnvelopeError};
use proptest::prelude::*;
use protocol::{
    ActionableCard, Answer, CardLocation, CardPosition, ChainOption, ChainRequest, DecodedRequest,
    IdleAction, IdleCommandRequest, Message, MessageKind, Notification, OptionRequest,
    PhaseTransition, PlaceChoice, PositionSelectionRequest,
};

fn answer_strategy() -> impl Strategy<Value = Answer> {
    let action = prop::sample::select(vec![
        IdleAction::NormalSummon,
        IdleAction::SpecialSummon,
        IdleAction::Reposition,
        IdleAction::MonsterSet,
        IdleAction::SpellTrapSet,
        IdleAction::Activate,
    ]);
    let position = prop::sample::select(vec![
        CardPosition::FaceUpAttack,
        CardPosition::FaceDownAttack,
        CardPosition::FaceUpDefense,
        CardPosition::FaceDownDefense,
    ]);
    let place = (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(player, location, sequence)| {
        PlaceChoice {
            player,
            location,
            sequence,
        }
    });
    prop_oneof![
        (action, any::<u16>()).prop_map(|(action, index)| Answer::SelectIdleAction { action, index }),
        prop::bool::ANY.prop_map(|battle| Answer::SelectPhase {
            phase: if battle {
                PhaseTransition::Battle
            } else {
                PhaseTransition::End
            },
        }),
        Just(Answer::SelectChainNoOp),
        any::<u32>().prop_map(|index| Answer::SelectChain { index }),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(|indices| Answer::SelectCards { indices }),
        any::<bool>().prop_map(|yes| Answer::SelectYesNo { yes }),
        any::<u32>().prop_map(|index| Answer::SelectOption { index }),
        prop::collection::vec(place, 0..4).prop_map(|places| Answer::SelectPlaces { places }),
        position.prop_map(|position| Answer::SelectPosition { position }),
    ]
}

fn card() -> impl Strategy<Value = ActionableCard> {
    (any::<u32>(), any::<u8>(), any::<u32>())
        .prop_map(|(code, zone, slot)| ActionableCard::new(code, zone, slot))
}

fn message_strategy() -> impl Strategy<Value = Message> {
    let idle = (
        any::<u8>(),
        prop::collection::vec(card(), 0..4),
        prop::collection::vec(card(), 0..4),
        prop::collection::vec(card(), 0..4),
        any::<[bool; 3]>(),
    )
        .prop_map(|(player, normal_summons, repositions, activations, flags)| {
            DecodedRequest::Idle(IdleCommandRequest {
                player,
                normal_summons,
                repositions,
                activations,
                can_enter_battle_phase: flags[0],
                can_end_turn: flags[1],
                can_shuffle: flags[2],
                ..IdleCommandRequest::default()
            })
        });
    let chain = (any::<u8>(), any::<bool>(), prop::collection::vec((any::<u32>(), any::<u64>()), 0..4))
        .prop_map(|(player, forced, options)| {
            DecodedRequest::Chain(ChainRequest {
                player,
                forced,
                options: options
                    .into_iter()
                    .map(|(code, description)| ChainOption {
                        code,
                        location: CardLocation {
                            controller: player,
                            location: 0x4,
                            sequence: 1,
                            position: 0x1,
                        },
                        description,
                    })
                    .collect(),
                ..ChainRequest::default()
            })
        });
    let option = (any::<u8>(), prop::collection::vec(any::<u64>(), 0..6))
        .prop_map(|(player, options)| DecodedRequest::Option(OptionRequest { player, options }));
    let position = (any::<u8>(), any::<u32>(), any::<u8>()).prop_map(|(player, code, positions)| {
        DecodedRequest::Position(PositionSelectionRequest {
            player,
            code,
            positions,
        })
    });
    let events = prop_oneof![
        any::<u16>().prop_map(|phase| Notification::NewPhase { phase }),
        (any::<u8>(), any::<u32>()).prop_map(|(player, amount)| Notification::Recover { player, amount }),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(|body| Notification::Other {
            kind: MessageKind::Summoned,
            body,
        }),
    ];
    prop_oneof![
        prop_oneof![idle, chain, option, position].prop_map(Message::Request),
        events.prop_map(Message::Notification),
    ]
}

proptest! {
    #[test]
    fn prop_every_answer_roundtrips(answer in answer_strategy()) {
        let bytes = encode_answer(&answer);
        prop_assert_eq!(decode_answer(&bytes).unwrap(), answer);
    }

    #[test]
    fn prop_every_message_roundtrips(message in message_strategy()) {
        let bytes = encode_envelope(&message);
        prop_assert_eq!(decode_envelope(&bytes).unwrap(), message);
    }

    #[test]
    fn prop_proper_prefix_is_rejected(
        message in message_strategy(),
        cut in any::<prop::sample::Index>(),
    ) {
        let bytes = encode_envelope(&message);
        let cut = cut.index(bytes.len());
        prop_assert!(decode_envelope(&bytes[..cut]).is_err());
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let _ = decode_envelope(&bytes);
        let _ = decode_answer(&bytes);
    }
}

#[test]
fn unknown_top_level_field() {
    // field 3, length-delimited, empty
    assert_eq!(
        decode_envelope(&[0x1A, 0x00]).unwrap_err(),
        EnvelopeError::UnknownField {
            message: "Envelope",
            field: 3
        }
    );
}

#[test]
fn request_as_varint_is_wrong_wire_type() {
    assert_eq!(
        decode_envelope(&[0x08, 0x01]).unwrap_err(),
        EnvelopeError::WrongWireType {
            message: "Envelope",
            field: 1,
            wire_type: 0
        }
    );
}

#[test]
fn overlong_varint_is_invalid() {
    let mut bytes = vec![0x0A];
    bytes.extend_from_slice(&[0xFF; 11]);
    assert_eq!(decode_envelope(&bytes).unwrap_err(), EnvelopeError::InvalidVarint);
}
