//! Driving a session to completion, from a script or a live engine.

use anyhow::{Context, Result};
use codec::{DuelSession, SessionResult, StepReport};
use engine::{DuelEngine, MessageFormat, ScriptedEngine, StepStatus};
use protocol::Answer;
use serde::{Deserialize, Serialize};

use crate::autopilot::choose_answer;

/// A recorded duel: what the engine reported at each step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelScript {
    pub format: MessageFormat,
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub status: StepStatus,
    /// Hex-encoded message buffers, in emission order.
    #[serde(default)]
    pub messages: Vec<String>,
}

impl DuelScript {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parse duel script")
    }

    /// Builds an engine that replays the script.
    pub fn into_engine(self) -> Result<ScriptedEngine> {
        let mut engine = ScriptedEngine::new(self.format);
        for (index, step) in self.steps.into_iter().enumerate() {
            let messages = step
                .messages
                .iter()
                .map(|text| hex::decode(text.trim()))
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("step {index}: message is not valid hex"))?;
            engine = engine.then(step.status, messages);
        }
        Ok(engine)
    }
}

/// How a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunOutcome {
    Ended,
    StepLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub steps: usize,
    pub answers: usize,
    pub notifications: usize,
}

/// Advances until the duel ends or `max_steps` steps ran, answering every
/// request with [`choose_answer`]. `observe` sees each report and the answer
/// given to it.
pub fn run_duel<E: DuelEngine>(
    session: &DuelSession<E>,
    max_steps: usize,
    mut observe: impl FnMut(&StepReport, Option<&Answer>),
) -> SessionResult<RunSummary> {
    let mut summary = RunSummary {
        outcome: RunOutcome::StepLimit,
        steps: 0,
        answers: 0,
        notifications: 0,
    };
    while summary.steps < max_steps {
        let report = session.advance()?;
        summary.steps += 1;
        summary.notifications += report.notifications.len();

        if report.status == StepStatus::Ended {
            observe(&report, None);
            summary.outcome = RunOutcome::Ended;
            break;
        }
        let answer = report.request.as_ref().map(choose_answer);
        observe(&report, answer.as_ref());
        if let Some(answer) = answer {
            session.submit_answer(&answer)?;
            summary.answers += 1;
        }
    }
    Ok(summary)
}
