//! The engine seam and the gateway that owns it.

use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::options::CardPlacement;

/// Status reported by one engine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepStatus {
    /// The duel is over; no further input is possible.
    Ended,
    /// The engine is blocked on a request.
    AwaitingAnswer,
    /// The engine can be stepped again without input.
    Continuing,
}

impl StepStatus {
    pub const fn from_raw(raw: i32) -> EngineResult<Self> {
        match raw {
            0 => Ok(Self::Ended),
            1 => Ok(Self::AwaitingAnswer),
            2 => Ok(Self::Continuing),
            _ => Err(EngineError::UnknownStatus { raw }),
        }
    }

    #[must_use]
    pub const fn raw(self) -> i32 {
        match self {
            Self::Ended => 0,
            Self::AwaitingAnswer => 1,
            Self::Continuing => 2,
        }
    }
}

/// Which codec a message buffer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageFormat {
    /// Fixed little-endian layouts behind a one-byte discriminator.
    Legacy,
    /// Schema-described structured envelope.
    Envelope,
}

/// One undecoded message produced by a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub format: MessageFormat,
    pub bytes: Vec<u8>,
}

/// Everything one step produced, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub status: StepStatus,
    pub messages: Vec<RawMessage>,
}

/// The seam to a duel engine.
///
/// Implementations are driven exclusively through [`Gateway`], which enforces
/// the calling order; the methods here may assume it.
pub trait DuelEngine: Send {
    /// Format of the buffers returned by [`next_message`](Self::next_message).
    fn message_format(&self) -> MessageFormat;

    fn place_card(&mut self, placement: &CardPlacement) -> EngineResult<()>;

    fn start(&mut self) -> EngineResult<()>;

    /// Runs the engine until it blocks, ends, or yields.
    ///
    /// Messages from the previous step that were not read are discarded.
    fn step(&mut self) -> EngineResult<StepStatus>;

    /// Pops the next buffered message of the current step.
    fn next_message(&mut self) -> EngineResult<Option<Vec<u8>>>;

    fn submit_answer(&mut self, bytes: &[u8]) -> EngineResult<()>;

    /// Frees the native resources. Called at most once.
    fn release(&mut self);
}

/// Exclusive owner of an engine handle.
///
/// [`step`](Self::step) drains every buffered message before returning, so no
/// caller can step again while messages are unread. The handle is released
/// exactly once, explicitly or on drop.
pub struct Gateway<E: DuelEngine> {
    engine: E,
    started: bool,
    released: bool,
}

impl<E: DuelEngine> Gateway<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            started: false,
            released: false,
        }
    }

    pub fn message_format(&self) -> MessageFormat {
        self.engine.message_format()
    }

    /// Returns the engine, for inspection.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub const fn is_started(&self) -> bool {
        self.started
    }

    pub const fn is_released(&self) -> bool {
        self.released
    }

    pub fn place_card(&mut self, placement: &CardPlacement) -> EngineResult<()> {
        self.ensure_live()?;
        if self.started {
            return Err(EngineError::OutOfOrder {
                operation: "place_card",
                reason: "duel already started",
            });
        }
        self.engine.place_card(placement)
    }

    pub fn start(&mut self) -> EngineResult<()> {
        self.ensure_live()?;
        if self.started {
            return Err(EngineError::OutOfOrder {
                operation: "start",
                reason: "duel already started",
            });
        }
        self.engine.start()?;
        self.started = true;
        debug!("duel started");
        Ok(())
    }

    /// Steps once and drains the engine's queue to exhaustion.
    pub fn step(&mut self) -> EngineResult<StepOutcome> {
        self.ensure_running("step")?;
        let status = self.engine.step()?;
        let format = self.engine.message_format();
        let mut messages = Vec::new();
        while let Some(bytes) = self.engine.next_message()? {
            messages.push(RawMessage { format, bytes });
        }
        debug!(?status, messages = messages.len(), "engine step");
        Ok(StepOutcome { status, messages })
    }

    pub fn submit_answer(&mut self, bytes: &[u8]) -> EngineResult<()> {
        self.ensure_running("submit_answer")?;
        debug!(len = bytes.len(), "submitting answer");
        self.engine.submit_answer(bytes)
    }

    /// Releases the handle. Calling it again is a no-op.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.engine.release();
        self.released = true;
        debug!("engine released");
    }

    fn ensure_live(&self) -> EngineResult<()> {
        if self.released {
            warn!("engine call after release");
            return Err(EngineError::Released);
        }
        Ok(())
    }

    fn ensure_running(&self, operation: &'static str) -> EngineResult<()> {
        self.ensure_live()?;
        if !self.started {
            return Err(EngineError::OutOfOrder {
                operation,
                reason: "duel not started",
            });
        }
        Ok(())
    }
}

impl<E: DuelEngine> Drop for Gateway<E> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<E: DuelEngine + std::fmt::Debug> std::fmt::Debug for Gateway<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("engine", &self.engine)
            .field("started", &self.started)
            .field("released", &self.released)
            .finish()
    }
}
