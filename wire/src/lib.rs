//! Legacy binary message codec for the ocgbridge adapter.
//!
//! Every engine message starts with a one-byte [`MessageKind`] discriminator
//! followed by a fixed, kind-specific little-endian layout. This crate decodes
//! those layouts into the [`protocol`] model, encodes them back, and encodes
//! typed answers as the response buffers the engine expects.
//!
//! # Design Principles
//!
//! - **Order is the contract** - Fields are read strictly in wire order.
//! - **Bounded decoding** - Section counts are validated against [`Limits`] before
//!   any allocation.
//! - **Surfaced truncation** - Permissive decodes zero-fill short input and say so
//!   through [`Decoded::truncated`].

mod encode;
mod error;
mod idle;
mod limits;
mod message;
mod notifications;
mod requests;
mod response;
mod section;

pub use encode::{encode_message, encode_notification, encode_request};
pub use error::{DecodeError, LimitKind, WireResult};
pub use idle::decode_idle_command;
pub use limits::Limits;
pub use message::{decode_message, peek_kind, request_kind, Decoded};
pub use response::encode_response;

pub use bitstream::ReadMode;
pub use protocol::MessageKind;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = Limits::default();
        let _ = ReadMode::default();
        let _: WireResult<()> = Ok(());
        let _ = decode_message;
        let _ = encode_response;
    }

    #[test]
    fn decode_defaults_to_permissive() {
        let decoded = decode_message(
            &[MessageKind::NewTurn.raw()],
            ReadMode::default(),
            &Limits::default(),
        )
        .unwrap();
        assert!(decoded.truncated);
    }
}
