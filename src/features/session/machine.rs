//! # Debate Session
//!
//! The debate room state machine. It does no I/O: operations that need the
//! backend return a [`Command`] for the driver to execute, and the driver
//! feeds the outcome back through the matching `on_*_result` input.
//!
//! ```text
//! NotStarted --start ok--> Active --end / forfeit / expiry--> Ended
//!      ^  |
//!      +--+ start failed (retry allowed)
//! ```

use log::{debug, info, warn};

use crate::api::{Debate, Message, Sender, Winner};
use crate::core::ApiError;
use crate::core::SessionFailure;
use crate::features::session::clock::{ClockSnapshot, SessionClock, TickOutcome, TimerKind};
use crate::features::session::view::{Destination, SessionView};

/// Shown in the transcript when an exchange fails
pub const EXCHANGE_ERROR_TEXT: &str = "An error occurred. Please try again.";
/// Shown when the backend refuses to start the debate
pub const START_ERROR_TEXT: &str = "Could not start the debate. Please try again.";
/// Confirmation the user must accept before forfeiting
pub const FORFEIT_PROMPT: &str = "Are you sure you want to give up? The AI will win this round.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Active,
    Ended,
}

/// Injected configuration, built from the bootstrap debate resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub debate_id: u64,
    pub total_budget_secs: u32,
    pub reply_budget_secs: u32,
    /// Guests see the trial-ended prompt instead of the results view
    pub authenticated: bool,
}

impl SessionConfig {
    pub fn from_debate(debate: &Debate, authenticated: bool) -> Self {
        SessionConfig {
            debate_id: debate.id,
            total_budget_secs: debate.total_budget_secs(),
            reply_budget_secs: debate.reply_time_limit,
            authenticated,
        }
    }
}

/// Backend work requested by the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Mark the debate active
    Start,
    /// Post the user message, then ask for the AI reply
    Exchange { ticket: u64, content: String },
    /// Record the final state
    End { winner: Winner },
}

pub struct DebateSession<V: SessionView> {
    config: SessionConfig,
    view: V,
    phase: Phase,
    clock: SessionClock,
    transcript: Vec<Message>,
    start_pending: bool,
    /// Ticket of the exchange awaiting its AI reply
    in_flight: Option<u64>,
    next_ticket: u64,
    end_pending: bool,
    winner: Option<Winner>,
    destination: Option<Destination>,
}

impl<V: SessionView> DebateSession<V> {
    pub fn new(config: SessionConfig, mut view: V) -> Self {
        let clock = SessionClock::new(config.total_budget_secs, config.reply_budget_secs);
        view.set_start_enabled(true);
        view.set_input_enabled(false);
        view.update_clock(clock.snapshot());

        DebateSession {
            config,
            view,
            phase: Phase::NotStarted,
            clock,
            transcript: Vec::new(),
            start_pending: false,
            in_flight: None,
            next_ticket: 1,
            end_pending: false,
            winner: None,
            destination: None,
        }
    }

    // ------------------------------------------------------------------
    // User inputs
    // ------------------------------------------------------------------

    pub fn start(&mut self) -> Option<Command> {
        if self.phase != Phase::NotStarted || self.start_pending {
            debug!("Ignoring start for debate {} in {:?}", self.config.debate_id, self.phase);
            return None;
        }
        self.start_pending = true;
        self.view.set_start_enabled(false);
        Some(Command::Start)
    }

    pub fn submit_message(&mut self, text: &str) -> Option<Command> {
        if self.phase != Phase::Active || self.in_flight.is_some() {
            return None;
        }
        let content = text.trim();
        if content.is_empty() {
            return None;
        }

        self.append(Message::new(Sender::User, content));
        self.clock.stop_reply();
        self.view.update_clock(self.clock.snapshot());
        self.view.set_input_enabled(false);
        self.view.set_typing(true);

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        debug!("Exchange {} issued for debate {}", ticket, self.config.debate_id);

        Some(Command::Exchange {
            ticket,
            content: content.to_string(),
        })
    }

    /// Give up. Does nothing unless the user confirmed [`FORFEIT_PROMPT`].
    pub fn forfeit(&mut self, confirmed: bool) -> Option<Command> {
        if self.phase != Phase::Active || !confirmed {
            return None;
        }
        info!("User forfeited debate {}", self.config.debate_id);
        self.end(Winner::Ai)
    }

    pub fn end(&mut self, winner: Winner) -> Option<Command> {
        if self.phase != Phase::Active {
            return None;
        }
        self.phase = Phase::Ended;
        self.winner = Some(winner);
        self.end_pending = true;

        self.clock.stop_all();
        self.view.update_clock(self.clock.snapshot());
        self.view.set_typing(false);
        self.view.set_input_enabled(false);
        self.view.set_start_enabled(false);

        info!("Debate {} ended, winner: {}", self.config.debate_id, winner);
        Some(Command::End { winner })
    }

    // ------------------------------------------------------------------
    // Scheduled and network inputs
    // ------------------------------------------------------------------

    pub fn on_tick(&mut self, kind: TimerKind) -> Option<Command> {
        if self.phase != Phase::Active {
            return None;
        }
        match self.clock.tick(kind) {
            TickOutcome::Idle => None,
            TickOutcome::Running(_) => {
                self.view.update_clock(self.clock.snapshot());
                None
            }
            TickOutcome::Expired => {
                self.view.update_clock(self.clock.snapshot());
                match kind {
                    TimerKind::Total => {
                        info!("Total time ran out for debate {}", self.config.debate_id);
                        self.end(Winner::User)
                    }
                    TimerKind::Reply => {
                        info!("Reply time ran out for debate {}", self.config.debate_id);
                        self.end(Winner::Ai)
                    }
                }
            }
        }
    }

    pub fn on_start_result(&mut self, result: Result<(), ApiError>) {
        if self.phase != Phase::NotStarted || !self.start_pending {
            debug!("Discarding stale start result for debate {}", self.config.debate_id);
            return;
        }
        self.start_pending = false;

        match result {
            Ok(()) => {
                self.phase = Phase::Active;
                self.clock.start_all();
                self.view.set_input_enabled(true);
                self.view.update_clock(self.clock.snapshot());
                info!("Debate {} started", self.config.debate_id);
            }
            Err(e) => {
                warn!("{}", SessionFailure::Start(e));
                self.view.set_start_enabled(true);
                self.view.notify(START_ERROR_TEXT);
            }
        }
    }

    pub fn on_exchange_result(&mut self, ticket: u64, result: Result<Message, ApiError>) {
        if self.phase != Phase::Active || self.in_flight != Some(ticket) {
            debug!(
                "Discarding stale exchange {} for debate {} ({:?})",
                ticket, self.config.debate_id, self.phase
            );
            return;
        }
        self.in_flight = None;
        self.view.set_typing(false);

        match result {
            Ok(reply) => {
                self.append(reply);
                self.clock.restart_reply();
                self.view.update_clock(self.clock.snapshot());
            }
            Err(e) => {
                warn!("{}", SessionFailure::Exchange(e));
                self.append(Message::new(Sender::System, EXCHANGE_ERROR_TEXT));
            }
        }
        self.view.set_input_enabled(true);
    }

    /// The end notification resolved. Failure is logged and does not block
    /// the terminal side effect.
    pub fn on_end_result(&mut self, result: Result<(), ApiError>) {
        if !self.end_pending {
            return;
        }
        self.end_pending = false;

        if let Err(e) = result {
            warn!("{}", SessionFailure::Termination(e));
        }

        let Some(winner) = self.winner else {
            return;
        };
        let destination = if self.config.authenticated {
            self.view
                .notify(&format!("Debate Over! Winner: {}", winner.as_str().to_uppercase()));
            Destination::Results { winner }
        } else {
            Destination::TrialEnded { winner }
        };
        self.view.navigate(&destination);
        self.destination = Some(destination);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    fn append(&mut self, message: Message) {
        self.view.render_message(&message);
        self.transcript.push(message);
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn clock(&self) -> ClockSnapshot {
        self.clock.snapshot()
    }

    pub fn timer_running(&self, kind: TimerKind) -> bool {
        self.clock.countdown(kind).is_running()
    }

    pub fn timer_generation(&self, kind: TimerKind) -> u64 {
        self.clock.countdown(kind).generation()
    }

    pub fn is_start_pending(&self) -> bool {
        self.start_pending
    }

    pub fn is_exchange_in_flight(&self) -> bool {
        self.phase == Phase::Active && self.in_flight.is_some()
    }

    pub fn is_end_pending(&self) -> bool {
        self.end_pending
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn destination(&self) -> Option<Destination> {
        self.destination
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_transcript(self) -> Vec<Message> {
        self.transcript
    }
}
