//! Duel session driving for ocgbridge.
//!
//! This crate ties the engine gateway to the legacy and envelope codecs: a
//! [`DuelSession`] steps the engine, decodes everything a step emitted, holds
//! the request the engine is blocked on, and forwards exactly one encoded
//! answer per request.
//!
//! # Lifecycle
//!
//! ```text
//! Continuing --advance, request decoded--> AwaitingAnswer
//! Continuing --advance, no request-------> Continuing
//! AwaitingAnswer --submit_answer---------> Continuing
//! any live state --duel over-------------> Ended
//! any live state --engine/decode failure-> Faulted
//! ```
//!
//! # Design Principles
//!
//! - **One call in flight** - Every engine call happens under the session lock.
//! - **No unread messages** - A step's messages are all decoded before the
//!   next call can reach the engine.
//! - **Terminal states stay terminal** - After `Ended` or `Faulted`, every
//!   call fails and the fault cause is kept.
//! - **Permissive reads degrade** - Undecodable notifications are stepped
//!   over and counted in [`StepReport::undecoded`]; prompts still fault.
//! - **Format agnostic** - The engine decides between legacy and envelope
//!   buffers; callers only see typed messages and answers.

mod config;
mod dispatch;
mod error;
mod session;
mod worker;

pub use config::SessionConfig;
pub use dispatch::{decode_raw, encode_answer};
pub use error::{DecodeError, Fault, SessionError, SessionResult};
pub use session::{DuelSession, SessionState, StepReport};
pub use worker::SessionWorker;

pub use bitstream::ReadMode;
pub use wire::Limits as WireLimits;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = SessionConfig::default();
        let _ = WireLimits::default();
        let _: SessionResult<()> = Ok(());
        assert_eq!(ReadMode::default(), ReadMode::Permissive);
    }
}
