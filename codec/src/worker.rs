//! Running a session on its own thread.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use engine::DuelEngine;
use protocol::{Answer, DecodedRequest};
use tracing::{debug, warn};

use crate::error::{SessionError, SessionResult};
use crate::session::{DuelSession, SessionState, StepReport};

enum Command {
    Advance(Sender<SessionResult<StepReport>>),
    Submit(Answer, Sender<SessionResult<()>>),
    State(Sender<SessionState>),
    Pending(Sender<Option<DecodedRequest>>),
}

/// A session owned by a dedicated thread.
///
/// Engine steps can take arbitrarily long and cannot be interrupted, so
/// callers that must stay responsive send commands here and wait on the reply
/// channel when it suits them. The thread exits, releasing the engine, when
/// the worker is shut down or dropped.
pub struct SessionWorker {
    commands: Option<Sender<Command>>,
    thread: Option<JoinHandle<()>>,
}

impl SessionWorker {
    /// Moves `session` onto a new thread named `duel-session`.
    pub fn spawn<E>(session: DuelSession<E>) -> io::Result<Self>
    where
        E: DuelEngine + 'static,
    {
        let (commands, inbox) = unbounded();
        let thread = thread::Builder::new()
            .name("duel-session".into())
            .spawn(move || run(&session, &inbox))?;
        Ok(Self {
            commands: Some(commands),
            thread: Some(thread),
        })
    }

    /// Queues an advance and returns the channel its report arrives on.
    pub fn request_advance(&self) -> Receiver<SessionResult<StepReport>> {
        let (reply, receiver) = bounded(1);
        self.send(Command::Advance(reply));
        receiver
    }

    /// Queues an answer and returns the channel its result arrives on.
    pub fn request_submit(&self, answer: Answer) -> Receiver<SessionResult<()>> {
        let (reply, receiver) = bounded(1);
        self.send(Command::Submit(answer, reply));
        receiver
    }

    /// Advances and waits for the report.
    pub fn advance(&self) -> SessionResult<StepReport> {
        self.request_advance()
            .recv()
            .map_err(|_| SessionError::Disconnected)?
    }

    /// Submits and waits for the result.
    pub fn submit_answer(&self, answer: Answer) -> SessionResult<()> {
        self.request_submit(answer)
            .recv()
            .map_err(|_| SessionError::Disconnected)?
    }

    pub fn state(&self) -> SessionResult<SessionState> {
        let (reply, receiver) = bounded(1);
        self.send(Command::State(reply));
        receiver.recv().map_err(|_| SessionError::Disconnected)
    }

    pub fn pending_request(&self) -> SessionResult<Option<DecodedRequest>> {
        let (reply, receiver) = bounded(1);
        self.send(Command::Pending(reply));
        receiver.recv().map_err(|_| SessionError::Disconnected)
    }

    /// Stops the thread after queued commands finish and waits for it.
    pub fn shutdown(mut self) -> SessionResult<()> {
        self.join()
    }

    // A failed send drops the reply sender, so the caller sees Disconnected
    // on its receiver.
    fn send(&self, command: Command) {
        if let Some(commands) = &self.commands {
            if commands.send(command).is_err() {
                warn!("session worker is gone");
            }
        }
    }

    fn join(&mut self) -> SessionResult<()> {
        self.commands.take();
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| SessionError::Disconnected),
            None => Ok(()),
        }
    }
}

impl Drop for SessionWorker {
    fn drop(&mut self) {
        if self.join().is_err() {
            warn!("session worker panicked");
        }
    }
}

fn run<E: DuelEngine>(session: &DuelSession<E>, inbox: &Receiver<Command>) {
    debug!("session worker started");
    for command in inbox {
        // A caller that stopped listening is not an error.
        match command {
            Command::Advance(reply) => {
                let _ = reply.send(session.advance());
            }
            Command::Submit(answer, reply) => {
                let _ = reply.send(session.submit_answer(&answer));
            }
            Command::State(reply) => {
                let _ = reply.send(session.state());
            }
            Command::Pending(reply) => {
                let _ = reply.send(session.pending_request());
            }
        }
    }
    debug!("session worker stopped");
}
