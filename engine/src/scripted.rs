//! A deterministic in-process engine.
//!
//! [`ScriptedEngine`] replays a queue of prepared steps and records what it
//! was sent. It stands in for the native engine in tests and in tooling that
//! replays captured messages.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{EngineError, EngineResult};
use crate::gateway::{DuelEngine, MessageFormat, StepStatus};
use crate::options::{CardPlacement, DuelOptions};

/// One prepared step: the raw status code and the buffers it emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedStep {
    pub status: i32,
    pub messages: Vec<Vec<u8>>,
}

#[derive(Debug, Default)]
struct JournalState {
    placements: Vec<CardPlacement>,
    answers: Vec<Vec<u8>>,
    started: bool,
    steps: usize,
    releases: usize,
}

/// Shared record of the calls a [`ScriptedEngine`] received.
///
/// Stays readable after the engine has moved into a gateway or session.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    state: Arc<Mutex<JournalState>>,
}

impl Journal {
    fn lock(&self) -> MutexGuard<'_, JournalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn placements(&self) -> Vec<CardPlacement> {
        self.lock().placements.clone()
    }

    /// Answer buffers in submission order.
    pub fn answers(&self) -> Vec<Vec<u8>> {
        self.lock().answers.clone()
    }

    pub fn started(&self) -> bool {
        self.lock().started
    }

    /// Number of step calls, failed ones included.
    pub fn steps(&self) -> usize {
        self.lock().steps
    }

    /// Number of times the engine was released.
    pub fn releases(&self) -> usize {
        self.lock().releases
    }
}

#[derive(Debug)]
pub struct ScriptedEngine {
    format: MessageFormat,
    options: DuelOptions,
    steps: VecDeque<ScriptedStep>,
    queue: VecDeque<Vec<u8>>,
    failing_step: Option<(usize, String)>,
    answer_rejection: Option<String>,
    journal: Journal,
}

impl ScriptedEngine {
    pub fn new(format: MessageFormat) -> Self {
        Self {
            format,
            options: DuelOptions::default(),
            steps: VecDeque::new(),
            queue: VecDeque::new(),
            failing_step: None,
            answer_rejection: None,
            journal: Journal::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: DuelOptions) -> Self {
        self.options = options;
        self
    }

    pub const fn options(&self) -> &DuelOptions {
        &self.options
    }

    /// Queues a step that reports `status` and emits `messages` in order.
    #[must_use]
    pub fn then(self, status: StepStatus, messages: impl IntoIterator<Item = Vec<u8>>) -> Self {
        self.then_raw(status.raw(), messages)
    }

    /// Queues a step with an arbitrary raw status code.
    #[must_use]
    pub fn then_raw(mut self, status: i32, messages: impl IntoIterator<Item = Vec<u8>>) -> Self {
        self.steps.push_back(ScriptedStep {
            status,
            messages: messages.into_iter().collect(),
        });
        self
    }

    /// Makes the step call with zero-based index `index` fail.
    #[must_use]
    pub fn fail_step(mut self, index: usize, reason: impl Into<String>) -> Self {
        self.failing_step = Some((index, reason.into()));
        self
    }

    /// Makes every answer submission fail.
    #[must_use]
    pub fn reject_answers(mut self, reason: impl Into<String>) -> Self {
        self.answer_rejection = Some(reason.into());
        self
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    /// Steps still queued.
    pub fn remaining_steps(&self) -> usize {
        self.steps.len()
    }
}

impl DuelEngine for ScriptedEngine {
    fn message_format(&self) -> MessageFormat {
        self.format
    }

    fn place_card(&mut self, placement: &CardPlacement) -> EngineResult<()> {
        self.journal.lock().placements.push(*placement);
        Ok(())
    }

    fn start(&mut self) -> EngineResult<()> {
        self.journal.lock().started = true;
        Ok(())
    }

    /// Once the queue is exhausted every step reports `Ended`.
    fn step(&mut self) -> EngineResult<StepStatus> {
        let index = {
            let mut journal = self.journal.lock();
            journal.steps += 1;
            journal.steps - 1
        };
        self.queue.clear();
        if let Some((failing, reason)) = &self.failing_step {
            if *failing == index {
                return Err(EngineError::CallFailed {
                    operation: "step",
                    reason: reason.clone(),
                });
            }
        }
        let Some(step) = self.steps.pop_front() else {
            return Ok(StepStatus::Ended);
        };
        let status = StepStatus::from_raw(step.status)?;
        self.queue.extend(step.messages);
        Ok(status)
    }

    fn next_message(&mut self) -> EngineResult<Option<Vec<u8>>> {
        Ok(self.queue.pop_front())
    }

    fn submit_answer(&mut self, bytes: &[u8]) -> EngineResult<()> {
        if let Some(reason) = &self.answer_rejection {
            return Err(EngineError::CallFailed {
                operation: "submit_answer",
                reason: reason.clone(),
            });
        }
        self.journal.lock().answers.push(bytes.to_vec());
        Ok(())
    }

    fn release(&mut self) {
        self.journal.lock().releases += 1;
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_steps_in_order() {
        let mut engine = ScriptedEngine::new(MessageFormat::Legacy)
            .then(StepStatus::Continuing, [vec![1], vec![2]])
            .then(StepStatus::AwaitingAnswer, [vec![3]]);
        assert_eq!(engine.step(), Ok(StepStatus::Continuing));
        assert_eq!(engine.next_message(), Ok(Some(vec![1])));
        assert_eq!(engine.next_message(), Ok(Some(vec![2])));
        assert_eq!(engine.next_message(), Ok(None));
        assert_eq!(engine.step(), Ok(StepStatus::AwaitingAnswer));
        assert_eq!(engine.next_message(), Ok(Some(vec![3])));
        assert_eq!(engine.step(), Ok(StepStatus::Ended));
        assert_eq!(engine.journal().steps(), 3);
    }

    #[test]
    fn stepping_discards_unread_messages() {
        let mut engine = ScriptedEngine::new(MessageFormat::Legacy)
            .then(StepStatus::Continuing, [vec![1], vec![2]])
            .then(StepStatus::Continuing, [vec![3]]);
        engine.step().unwrap();
        engine.step().unwrap();
        assert_eq!(engine.next_message(), Ok(Some(vec![3])));
        assert_eq!(engine.next_message(), Ok(None));
    }

    #[test]
    fn injected_failures() {
        let mut engine = ScriptedEngine::new(MessageFormat::Envelope)
            .then(StepStatus::Continuing, [])
            .fail_step(1, "boom")
            .reject_answers("bad answer");
        assert_eq!(engine.step(), Ok(StepStatus::Continuing));
        assert!(matches!(
            engine.step(),
            Err(EngineError::CallFailed {
                operation: "step",
                ..
            })
        ));
        assert!(engine.submit_answer(&[1]).is_err());
        assert!(engine.journal().answers().is_empty());
    }

    #[test]
    fn unknown_raw_status() {
        let mut engine = ScriptedEngine::new(MessageFormat::Legacy).then_raw(9, []);
        assert_eq!(engine.step(), Err(EngineError::UnknownStatus { raw: 9 }));
    }
}
