//! # Session Driver
//!
//! Runs a [`DebateSession`] on tokio: one-second intervals for the two
//! countdowns, a channel of user actions, and spawned tasks for backend
//! calls whose results come back over a completion channel.

use log::{debug, info};
use std::future::pending;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};

use crate::api::{DebateAction, DebateApi, Message, Sender, Winner};
use crate::core::ApiError;
use crate::features::session::clock::TimerKind;
use crate::features::session::machine::{Command, DebateSession, Phase};
use crate::features::session::view::{Destination, SessionView};

/// Things the human can do in the debate room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Start,
    Submit(String),
    /// `confirmed` is the user's answer to the forfeit prompt
    Forfeit { confirmed: bool },
}

/// Final state handed back once the session is over
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub phase: Phase,
    pub winner: Option<Winner>,
    pub destination: Option<Destination>,
    pub transcript: Vec<Message>,
}

enum Completion {
    Start(Result<(), ApiError>),
    Exchange { ticket: u64, result: Result<Message, ApiError> },
    End(Result<(), ApiError>),
}

/// A live interval tagged with the countdown generation it serves
struct LiveTimer {
    generation: u64,
    interval: Interval,
}

pub struct SessionDriver<A, V>
where
    A: DebateApi + 'static,
    V: SessionView,
{
    session: DebateSession<V>,
    api: Arc<A>,
    tick_period: Duration,
}

impl<A, V> SessionDriver<A, V>
where
    A: DebateApi + 'static,
    V: SessionView,
{
    pub fn new(session: DebateSession<V>, api: Arc<A>) -> Self {
        SessionDriver {
            session,
            api,
            tick_period: Duration::from_secs(1),
        }
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Drive the session until it has ended and the end notification has
    /// resolved. Returns early if the action channel closes before the
    /// debate was ever started.
    pub async fn run(mut self, mut actions: mpsc::Receiver<UserAction>) -> SessionReport {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
        let mut total: Option<LiveTimer> = None;
        let mut reply: Option<LiveTimer> = None;
        let mut actions_open = true;

        loop {
            self.sync_timer(TimerKind::Total, &mut total);
            self.sync_timer(TimerKind::Reply, &mut reply);

            if self.session.phase() == Phase::Ended && !self.session.is_end_pending() {
                break;
            }
            if !actions_open
                && self.session.phase() == Phase::NotStarted
                && !self.session.is_start_pending()
            {
                info!("Input closed before debate {} started", self.session.config().debate_id);
                break;
            }

            let command = tokio::select! {
                action = actions.recv(), if actions_open => match action {
                    Some(action) => self.apply_action(action),
                    None => {
                        debug!("Action channel closed");
                        actions_open = false;
                        None
                    }
                },
                _ = next_tick(&mut total) => self.session.on_tick(TimerKind::Total),
                _ = next_tick(&mut reply) => self.session.on_tick(TimerKind::Reply),
                Some(done) = done_rx.recv() => {
                    self.apply_completion(done);
                    None
                }
            };

            if let Some(command) = command {
                self.dispatch(command, done_tx.clone());
            }
        }

        SessionReport {
            phase: self.session.phase(),
            winner: self.session.winner(),
            destination: self.session.destination(),
            transcript: self.session.into_transcript(),
        }
    }

    fn apply_action(&mut self, action: UserAction) -> Option<Command> {
        match action {
            UserAction::Start => self.session.start(),
            UserAction::Submit(text) => self.session.submit_message(&text),
            UserAction::Forfeit { confirmed } => self.session.forfeit(confirmed),
        }
    }

    fn apply_completion(&mut self, done: Completion) {
        match done {
            Completion::Start(result) => self.session.on_start_result(result),
            Completion::Exchange { ticket, result } => self.session.on_exchange_result(ticket, result),
            Completion::End(result) => self.session.on_end_result(result),
        }
    }

    /// Keep the tokio interval in step with the countdown: a restarted
    /// countdown gets a fresh interval, a stopped one gets none.
    fn sync_timer(&self, kind: TimerKind, slot: &mut Option<LiveTimer>) {
        if !self.session.timer_running(kind) {
            *slot = None;
            return;
        }
        let generation = self.session.timer_generation(kind);
        if slot.as_ref().map(|t| t.generation) != Some(generation) {
            let mut interval = interval_at(Instant::now() + self.tick_period, self.tick_period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            *slot = Some(LiveTimer { generation, interval });
        }
    }

    fn dispatch(&self, command: Command, done: mpsc::UnboundedSender<Completion>) {
        let api = Arc::clone(&self.api);
        let debate_id = self.session.config().debate_id;

        match command {
            Command::Start => {
                tokio::spawn(async move {
                    let result = api.update_debate(debate_id, DebateAction::start()).await.map(|_| ());
                    let _ = done.send(Completion::Start(result));
                });
            }
            Command::Exchange { ticket, content } => {
                tokio::spawn(async move {
                    let result = exchange(api.as_ref(), debate_id, &content).await;
                    let _ = done.send(Completion::Exchange { ticket, result });
                });
            }
            Command::End { winner } => {
                tokio::spawn(async move {
                    let result = api
                        .update_debate(debate_id, DebateAction::end(winner))
                        .await
                        .map(|_| ());
                    let _ = done.send(Completion::End(result));
                });
            }
        }
    }
}

/// Post the user message, then ask for the AI reply. The second call is
/// only issued once the first has completed.
async fn exchange<A: DebateApi + ?Sized>(api: &A, debate_id: u64, content: &str) -> Result<Message, ApiError> {
    api.post_message(debate_id, content, Sender::User).await?;
    api.request_ai_response(debate_id, content).await
}

async fn next_tick(timer: &mut Option<LiveTimer>) {
    match timer {
        Some(live) => {
            live.interval.tick().await;
        }
        None => pending::<()>().await,
    }
}
