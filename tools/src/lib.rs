//! Inspection and replay tools for the ocgbridge adapter.
//!
//! - Decode captured legacy or envelope messages to JSON or text
//! - Replay recorded duels through a session, answering automatically
//! - Look up card metadata from an ocgcore card database
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Same code paths** - Everything goes through the session and codecs the
//!   adapter itself uses.

mod autopilot;
mod capture;
mod replay;

pub use autopilot::choose_answer;
pub use capture::{decode_capture, format_decode_pretty, parse_capture, DecodeReport};
pub use replay::{run_duel, DuelScript, RunOutcome, RunSummary, ScriptStep};
