//! Legacy answer encoding: the response buffers a raw engine accepts.

use bitstream::ByteWriter;
use protocol::{Answer, PhaseTransition};

const BATTLE_PHASE: i32 = 6;
const END_PHASE: i32 = 7;
const NO_CHAIN: i32 = -1;

/// Encodes an answer as the engine's response buffer. Total for every answer.
pub fn encode_response(answer: &Answer) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(4);
    match answer {
        Answer::SelectIdleAction { action, index } => {
            w.write_u32((u32::from(*index) << 16) | u32::from(*action as u8));
        }
        Answer::SelectPhase { phase } => w.write_i32(match phase {
            PhaseTransition::Battle => BATTLE_PHASE,
            PhaseTransition::End => END_PHASE,
        }),
        Answer::SelectChainNoOp => w.write_i32(NO_CHAIN),
        Answer::SelectChain { index } | Answer::SelectOption { index } => {
            w.write_i32(index_i32(*index));
        }
        Answer::SelectYesNo { yes } => w.write_i32(i32::from(*yes)),
        Answer::SelectCards { indices } => {
            let count = indices.len().min(usize::from(u8::MAX));
            w.write_u8(u8::try_from(count).unwrap_or(u8::MAX));
            w.write_bytes(&indices[..count]);
        }
        Answer::SelectPlaces { places } => {
            for place in places {
                w.write_u8(place.player);
                w.write_u8(place.location);
                w.write_u8(place.sequence);
            }
        }
        Answer::SelectPosition { position } => w.write_i32(i32::from(position.raw())),
    }
    w.finish()
}

/// Chain and option indices past `i32::MAX` saturate; no request offers that
/// many entries.
fn index_i32(index: u32) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}
