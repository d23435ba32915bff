//! Paced driver: one session on one tokio task, with a visible thinking pause.
//!
//! Commands from every [`SessionHandle`] are applied one at a time, so two
//! transitions never run against the session at once. When the session
//! hands out a [`ComputerTurn`], the driver arms a timer for it; the timer is
//! dropped as soon as the pending ticket changes (reset, human move), and a
//! ticket that still fires late is refused by the session itself.

use crate::ai::Difficulty;
use crate::session::{
    ComputerTurn, GameSession, SessionError, SessionEvent, SessionSnapshot,
};
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Sleep, sleep};
use tracing::{debug, error, info, instrument};

type Reply<T> = oneshot::Sender<T>;

/// Messages sent from handles to the driver task.
#[derive(Debug)]
enum Command {
    ChooseDifficulty(Difficulty, Reply<Result<(), SessionError>>),
    SubmitMove(usize, Reply<Result<(), SessionError>>),
    PlayAgain(Reply<()>),
    ResetAll(Reply<()>),
    Snapshot(Reply<SessionSnapshot>),
    Subscribe(Reply<mpsc::UnboundedReceiver<SessionEvent>>),
}

/// Cloneable front for a session running on a driver task.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl SessionHandle {
    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .map_err(|_| SessionError::DriverClosed)?;
        reply_rx.await.map_err(|_| SessionError::DriverClosed)
    }

    /// Starts a session in the given mode.
    pub async fn choose_difficulty(&self, difficulty: Difficulty) -> Result<(), SessionError> {
        self.request(|tx| Command::ChooseDifficulty(difficulty, tx))
            .await?
    }

    /// Submits a move for the player to move.
    pub async fn submit_move(&self, index: usize) -> Result<(), SessionError> {
        self.request(|tx| Command::SubmitMove(index, tx)).await?
    }

    /// Clears the board, keeping score and difficulty.
    pub async fn play_again(&self) -> Result<(), SessionError> {
        self.request(Command::PlayAgain).await
    }

    /// Clears everything.
    pub async fn reset_all(&self) -> Result<(), SessionError> {
        self.request(Command::ResetAll).await
    }

    /// Reads the query surface.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(Command::Snapshot).await
    }

    /// Registers a listener for session events.
    pub async fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<SessionEvent>, SessionError> {
        self.request(Command::Subscribe).await
    }
}

/// Runs `session` on a new tokio task.
///
/// The task stops once every handle is dropped and returns the session
/// through the join handle. Must be called inside a tokio runtime.
#[instrument(skip(session))]
pub fn spawn(session: GameSession, delay: Duration) -> (SessionHandle, JoinHandle<GameSession>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(session, delay, rx));
    (SessionHandle { tx }, task)
}

/// Timer armed for one pending computer turn.
type Timer = Option<(ComputerTurn, Pin<Box<Sleep>>)>;

async fn run(
    mut session: GameSession,
    delay: Duration,
    mut commands: mpsc::UnboundedReceiver<Command>,
) -> GameSession {
    info!(?delay, "Session driver started");
    let mut timer: Timer = None;

    loop {
        sync_timer(&session, &mut timer, delay);

        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => handle(&mut session, command),
                None => break,
            },
            ticket = due(&mut timer), if timer.is_some() => {
                timer = None;
                match session.fire_computer_turn(ticket) {
                    Ok(Some(index)) => debug!(index, "Computer turn applied"),
                    Ok(None) => debug!(?ticket, "Computer turn was stale"),
                    Err(e) => error!(error = %e, "Computer turn failed"),
                }
            }
        }
    }

    info!("Session driver stopped");
    session
}

/// Keeps the timer keyed to the session's pending ticket.
fn sync_timer(session: &GameSession, timer: &mut Timer, delay: Duration) {
    let pending = session.pending_computer_turn();
    let held = timer.as_ref().map(|(ticket, _)| *ticket);
    if held == pending {
        return;
    }
    if let Some(old) = held {
        debug!(?old, "Cancelling computer timer");
    }
    *timer = pending.map(|ticket| {
        debug!(?ticket, "Arming computer timer");
        (ticket, Box::pin(sleep(delay)))
    });
}

async fn due(timer: &mut Timer) -> ComputerTurn {
    match timer {
        Some((ticket, pause)) => {
            pause.as_mut().await;
            *ticket
        }
        None => std::future::pending().await,
    }
}

fn handle(session: &mut GameSession, command: Command) {
    // A dropped reply receiver just means the caller stopped waiting.
    match command {
        Command::ChooseDifficulty(difficulty, reply) => {
            let _ = reply.send(session.choose_difficulty(difficulty));
        }
        Command::SubmitMove(index, reply) => {
            let _ = reply.send(session.submit_move(index));
        }
        Command::PlayAgain(reply) => {
            session.play_again();
            let _ = reply.send(());
        }
        Command::ResetAll(reply) => {
            session.reset_all();
            let _ = reply.send(());
        }
        Command::Snapshot(reply) => {
            let _ = reply.send(session.snapshot());
        }
        Command::Subscribe(reply) => {
            let _ = reply.send(session.subscribe());
        }
    }
}
