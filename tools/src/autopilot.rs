//! A fixed answering policy for unattended duels.
//!
//! It ends the turn whenever it may, declines optional chains and otherwise
//! takes the first legal choice. Good enough to push a duel forward.

use protocol::{
    location, Answer, CardPosition, DecodedRequest, IdleAction, PhaseTransition, PlaceChoice,
    PlaceSelectionRequest,
};

const IDLE_ACTIONS: [IdleAction; 6] = [
    IdleAction::NormalSummon,
    IdleAction::SpecialSummon,
    IdleAction::Reposition,
    IdleAction::MonsterSet,
    IdleAction::SpellTrapSet,
    IdleAction::Activate,
];

/// Picks an answer for `request`.
pub fn choose_answer(request: &DecodedRequest) -> Answer {
    match request {
        DecodedRequest::Idle(idle) => {
            if idle.can_end_turn {
                return Answer::SelectPhase {
                    phase: PhaseTransition::End,
                };
            }
            if idle.can_enter_battle_phase {
                return Answer::SelectPhase {
                    phase: PhaseTransition::Battle,
                };
            }
            let action = IDLE_ACTIONS
                .into_iter()
                .find(|action| !idle.section(*action).is_empty())
                .unwrap_or(IdleAction::NormalSummon);
            Answer::SelectIdleAction { action, index: 0 }
        }
        DecodedRequest::Chain(chain) => {
            if chain.forced && !chain.options.is_empty() {
                Answer::SelectChain { index: 0 }
            } else {
                Answer::SelectChainNoOp
            }
        }
        DecodedRequest::Card(card) => {
            let available = u32::try_from(card.cards.len()).unwrap_or(u32::MAX);
            let take = card.min.max(1).min(available);
            Answer::SelectCards {
                indices: (0..u8::MAX)
                    .take(usize::try_from(take).unwrap_or(usize::MAX))
                    .collect(),
            }
        }
        DecodedRequest::YesNo(_) | DecodedRequest::EffectYesNo(_) => {
            Answer::SelectYesNo { yes: false }
        }
        DecodedRequest::Option(_) => Answer::SelectOption { index: 0 },
        DecodedRequest::Place(place) => Answer::SelectPlaces {
            places: free_places(place),
        },
        DecodedRequest::Position(position) => Answer::SelectPosition {
            position: first_position(position.positions),
        },
    }
}

/// Takes the first `count` enabled zones.
///
/// The mask's low half covers the choosing player's field and the high half
/// the opponent's; within each half bits 0-7 are monster zones and bits 8-15
/// spell/trap zones. A set bit means the zone cannot be picked.
fn free_places(place: &PlaceSelectionRequest) -> Vec<PlaceChoice> {
    (0..32u32)
        .filter(|bit| place.disabled_mask & (1 << bit) == 0)
        .take(usize::from(place.count.max(1)))
        .map(|bit| {
            let half = bit / 16;
            let within = bit % 16;
            let player = if half == 0 { place.player } else { 1 - place.player.min(1) };
            let (location, sequence) = if within < 8 {
                (location::MONSTER_ZONE, within)
            } else {
                (location::SPELL_TRAP_ZONE, within - 8)
            };
            PlaceChoice {
                player,
                location,
                sequence: u8::try_from(sequence).unwrap_or(u8::MAX),
            }
        })
        .collect()
}

fn first_position(allowed: u8) -> CardPosition {
    [
        CardPosition::FaceUpAttack,
        CardPosition::FaceDownAttack,
        CardPosition::FaceUpDefense,
        CardPosition::FaceDownDefense,
    ]
    .into_iter()
    .find(|position| allowed & position.raw() != 0)
    .unwrap_or(CardPosition::FaceUpAttack)
}
