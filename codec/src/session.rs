//! The duel session state machine.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use engine::{DuelEngine, Gateway, MessageFormat, StepStatus};
use protocol::{Answer, DecodedRequest, Message, Notification};
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::dispatch::{decode_raw, encode_answer, salvage, Salvaged};
use crate::error::{Fault, SessionError, SessionResult};

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// The engine can be advanced.
    Continuing,
    /// A request is pending and must be answered first.
    AwaitingAnswer,
    /// The duel is over. Terminal.
    Ended,
    /// An engine or decode failure stopped the session. Terminal.
    Faulted,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Continuing => "continuing",
            Self::AwaitingAnswer => "awaiting an answer",
            Self::Ended => "ended",
            Self::Faulted => "faulted",
        };
        write!(f, "{name}")
    }
}

/// What one [`DuelSession::advance`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Status the engine reported for the step.
    pub status: StepStatus,
    /// Non-blocking messages, in emission order.
    pub notifications: Vec<Notification>,
    /// The request now pending, if the step left one.
    pub request: Option<DecodedRequest>,
    /// A legacy message was shorter than its layout and was zero-filled.
    pub truncated: bool,
    /// Legacy notifications a permissive read could not decode. Known kinds
    /// are still reported as [`Notification::Other`]; unknown ones are gone.
    pub undecoded: usize,
}

/// Internal state; the pending request lives inside `Awaiting` so it exists
/// exactly when the session awaits an answer.
#[derive(Debug)]
enum Phase {
    Continuing,
    Awaiting(DecodedRequest),
    Ended,
    Faulted(Fault),
}

impl Phase {
    const fn state(&self) -> SessionState {
        match self {
            Self::Continuing => SessionState::Continuing,
            Self::Awaiting(_) => SessionState::AwaitingAnswer,
            Self::Ended => SessionState::Ended,
            Self::Faulted(_) => SessionState::Faulted,
        }
    }

    /// Error for any call on a terminal phase.
    fn terminal_error(&self) -> Option<SessionError> {
        match self {
            Self::Ended => Some(SessionError::Ended),
            Self::Faulted(cause) => Some(SessionError::Faulted {
                cause: cause.clone(),
            }),
            Self::Continuing | Self::Awaiting(_) => None,
        }
    }
}

struct SessionCore<E: DuelEngine> {
    gateway: Gateway<E>,
    config: SessionConfig,
    phase: Phase,
}

impl<E: DuelEngine> SessionCore<E> {
    fn advance(&mut self) -> SessionResult<StepReport> {
        if let Some(err) = self.phase.terminal_error() {
            return Err(err);
        }
        if let Phase::Awaiting(_) = self.phase {
            return Err(SessionError::InvalidState {
                operation: "advance",
                state: SessionState::AwaitingAnswer,
            });
        }

        let outcome = match self.gateway.step() {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.fault(Fault::Engine(err))),
        };

        let mut notifications = Vec::new();
        let mut request: Option<DecodedRequest> = None;
        let mut truncated = false;
        let mut undecoded = 0;
        for raw in &outcome.messages {
            let decoded = match decode_raw(raw, &self.config) {
                Ok(decoded) => decoded,
                Err(err) => match salvage(raw, &err, &self.config) {
                    Some(salvaged) => {
                        warn!(%err, len = raw.bytes.len(), "undecodable notification skipped");
                        undecoded += 1;
                        if let Salvaged::Opaque(notification) = salvaged {
                            notifications.push(notification);
                        }
                        continue;
                    }
                    None => return Err(self.fault(Fault::Decode(err))),
                },
            };
            if decoded.truncated {
                warn!(len = raw.bytes.len(), "legacy message truncated, zero-filled");
                truncated = true;
            }
            match decoded.value {
                Message::Notification(notification) => notifications.push(notification),
                Message::Request(next) => {
                    if let Some(previous) = request.replace(next) {
                        debug!(superseded = %previous.kind(), "request superseded within step");
                    }
                }
            }
        }

        let status = outcome.status;
        let request = if status == StepStatus::Ended {
            if let Some(dropped) = request {
                debug!(kind = %dropped.kind(), "request discarded, duel ended");
            }
            self.phase = Phase::Ended;
            self.gateway.release();
            None
        } else if let Some(request) = request {
            self.phase = Phase::Awaiting(request.clone());
            Some(request)
        } else if status == StepStatus::AwaitingAnswer {
            return Err(self.fault(Fault::RequestMissing));
        } else {
            self.phase = Phase::Continuing;
            None
        };

        debug!(
            ?status,
            state = %self.phase.state(),
            notifications = notifications.len(),
            "session advanced"
        );
        Ok(StepReport {
            status,
            notifications,
            request,
            truncated,
            undecoded,
        })
    }

    fn submit_answer(&mut self, answer: &Answer) -> SessionResult<()> {
        if let Some(err) = self.phase.terminal_error() {
            return Err(err);
        }
        let Phase::Awaiting(pending) = &self.phase else {
            return Err(SessionError::InvalidState {
                operation: "submit_answer",
                state: SessionState::Continuing,
            });
        };
        let expected = pending.kind();
        if !answer.answers(expected) {
            return Err(SessionError::AnswerKindMismatch {
                expected,
                found: answer.kind(),
            });
        }
        check_range(answer, pending)?;

        let bytes = encode_answer(answer, self.gateway.message_format());
        if let Err(err) = self.gateway.submit_answer(&bytes) {
            return Err(self.fault(Fault::Engine(err)));
        }
        debug!(%answer, "answer accepted");
        self.phase = Phase::Continuing;
        Ok(())
    }

    /// Moves to `Faulted` and releases the engine, whose state is no longer
    /// trusted. Returns the error for the failing call.
    fn fault(&mut self, cause: Fault) -> SessionError {
        warn!(%cause, "session faulted");
        self.phase = Phase::Faulted(cause.clone());
        self.gateway.release();
        SessionError::from(cause)
    }
}

/// Rejects answers that pick entries `pending` does not offer.
fn check_range(answer: &Answer, pending: &DecodedRequest) -> SessionResult<()> {
    match (answer, pending) {
        (Answer::SelectIdleAction { action, index }, DecodedRequest::Idle(idle)) => {
            within(usize::from(*index), idle.section(*action).len())
        }
        (Answer::SelectChain { index }, DecodedRequest::Chain(chain)) => {
            within(widen(*index), chain.options.len())
        }
        (Answer::SelectOption { index }, DecodedRequest::Option(option)) => {
            within(widen(*index), option.options.len())
        }
        (Answer::SelectCards { indices }, DecodedRequest::Card(card)) => {
            // The legacy response counts picks in one byte.
            within(indices.len(), usize::from(u8::MAX) + 1)?;
            indices
                .iter()
                .try_for_each(|index| within(usize::from(*index), card.cards.len()))
        }
        _ => Ok(()),
    }
}

fn within(index: usize, available: usize) -> SessionResult<()> {
    if index < available {
        Ok(())
    } else {
        Err(SessionError::AnswerOutOfRange { index, available })
    }
}

fn widen(index: u32) -> usize {
    usize::try_from(index).unwrap_or(usize::MAX)
}

/// A duel driven one step at a time.
///
/// Every operation takes the internal lock, so at most one engine call is in
/// flight even when the session is shared between threads. Calls block for as
/// long as the engine computes; use [`SessionWorker`](crate::SessionWorker) to
/// keep that off a latency-sensitive thread.
pub struct DuelSession<E: DuelEngine> {
    core: Mutex<SessionCore<E>>,
}

impl<E: DuelEngine> DuelSession<E> {
    /// Takes ownership of `gateway` and starts the duel if it has not been
    /// started yet. Cards must already be placed.
    pub fn start(mut gateway: Gateway<E>, config: SessionConfig) -> SessionResult<Self> {
        if !gateway.is_started() {
            gateway.start().map_err(SessionError::Engine)?;
        }
        Ok(Self {
            core: Mutex::new(SessionCore {
                gateway,
                config,
                phase: Phase::Continuing,
            }),
        })
    }

    /// Steps the engine once and decodes everything it emitted.
    ///
    /// Legal only while [`SessionState::Continuing`].
    pub fn advance(&self) -> SessionResult<StepReport> {
        self.lock().advance()
    }

    /// Answers the pending request.
    ///
    /// A mismatched answer, or one picking an entry the request does not
    /// offer, is rejected without touching the engine, and the request stays
    /// pending.
    pub fn submit_answer(&self, answer: &Answer) -> SessionResult<()> {
        self.lock().submit_answer(answer)
    }

    pub fn state(&self) -> SessionState {
        self.lock().phase.state()
    }

    pub fn pending_request(&self) -> Option<DecodedRequest> {
        match &self.lock().phase {
            Phase::Awaiting(request) => Some(request.clone()),
            _ => None,
        }
    }

    /// The cause of a fault, once faulted.
    pub fn fault(&self) -> Option<Fault> {
        match &self.lock().phase {
            Phase::Faulted(cause) => Some(cause.clone()),
            _ => None,
        }
    }

    pub fn message_format(&self) -> MessageFormat {
        self.lock().gateway.message_format()
    }

    /// Runs `f` against the engine while holding the lock.
    pub fn with_engine<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        f(self.lock().gateway.engine())
    }

    /// Gives the gateway back, for instance to inspect it after the duel.
    pub fn into_gateway(self) -> Gateway<E> {
        self.core
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .gateway
    }

    fn lock(&self) -> MutexGuard<'_, SessionCore<E>> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: DuelEngine> fmt::Debug for DuelSession<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.lock();
        f.debug_struct("DuelSession")
            .field("state", &core.phase.state())
            .field("format", &core.gateway.message_format())
            .field("config", &core.config)
            .finish()
    }
}
