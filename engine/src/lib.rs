//! Engine boundary for the ocgbridge adapter.
//!
//! A duel engine is reached through the [`DuelEngine`] trait and owned by a
//! [`Gateway`], which enforces the calling order: cards are placed before
//! start, every step drains the engine's message queue, and the handle is
//! released exactly once.
//!
//! Implementations:
//! - [`ScriptedEngine`] replays prepared steps in-process
//! - `NativeEngine` (feature `native`) drives ocgcore through its C API
//!
//! The engine's collaborators live here too: the shared [`CardStore`] read by
//! the card-data callback (loadable from a card database with feature
//! `sqlite`) and the [`ScriptLoader`] seam for effect scripts.
//!
//! # Design Principles
//!
//! - **Exclusive ownership** - A handle has one owner and is released once.
//! - **Drain before step** - Unread messages cannot be lost by stepping twice.
//! - **Failures are final** - Engine errors are reported, never retried.

mod cards;
mod error;
mod gateway;
#[cfg(feature = "native")]
mod native;
mod options;
mod scripted;
mod scripts;

pub use cards::{CardStats, CardStore, PackedCard, TYPE_LINK};
#[cfg(feature = "sqlite")]
pub use cards::CardDbError;
pub use error::{EngineError, EngineResult};
pub use gateway::{DuelEngine, Gateway, MessageFormat, RawMessage, StepOutcome, StepStatus};
#[cfg(feature = "native")]
pub use native::NativeEngine;
pub use options::{location, CardPlacement, DuelOptions};
pub use scripted::{Journal, ScriptedEngine, ScriptedStep};
pub use scripts::{NoScripts, ScriptDirectory, ScriptLoader};
