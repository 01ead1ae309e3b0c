//! Structured envelope codec for the ocgbridge adapter.
//!
//! Newer engine builds emit messages as a schema-described envelope instead of
//! the fixed legacy layouts. The envelope uses the protobuf wire format
//! (varint and length-delimited fields only), so any protobuf runtime can read
//! what this crate writes:
//!
//! ```text
//! Envelope one-of { 1 Request, 2 Event }
//! ```
//!
//! Answers travel back as a standalone `Answer` message. The schema of each
//! payload is documented next to its codec.
//!
//! # Design Principles
//!
//! - **Schema-strict** - Unknown fields, wrong wire types and out-of-range
//!   values are errors; nothing is skipped or zero-filled.
//! - **Total encoding** - Every [`Message`] and [`Answer`] value encodes.
//! - **Shared model** - Decodes into the same [`protocol`] types as the legacy
//!   codec.

mod answer;
mod error;
mod event;
mod field;
mod request;

pub use error::{EnvelopeError, EnvelopeResult};

use protocol::{Answer, Message};

use field::{FieldReader, FieldWriter};

/// Decodes one envelope into a request or an event.
pub fn decode_envelope(bytes: &[u8]) -> EnvelopeResult<Message> {
    let mut reader = FieldReader::new("Envelope", bytes);
    let mut message = None;
    while let Some(field) = reader.next_field()? {
        let decoded = match field.number {
            1 => Message::Request(request::read_request(field.message("Request")?)?),
            2 => Message::Notification(event::read_event(field.message("Event")?)?),
            _ => return Err(field.unknown()),
        };
        if message.replace(decoded).is_some() {
            return Err(field.duplicate());
        }
    }
    message.ok_or(EnvelopeError::MissingPayload {
        message: "Envelope",
    })
}

pub fn encode_envelope(message: &Message) -> Vec<u8> {
    let mut w = FieldWriter::new();
    match message {
        Message::Request(request) => w.message(1, |w| request::write_request(w, request)),
        Message::Notification(notification) => {
            w.message(2, |w| event::write_event(w, notification));
        }
    }
    w.finish()
}

pub fn encode_answer(answer: &Answer) -> Vec<u8> {
    let mut w = FieldWriter::new();
    answer::write_answer(&mut w, answer);
    w.finish()
}

pub fn decode_answer(bytes: &[u8]) -> EnvelopeResult<Answer> {
    answer::read_answer(FieldReader::new("Answer", bytes))
}
