//! # Debate Room Feature
//!
//! Turn-taking between the human and the AI responder under two countdowns.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Request tickets so late replies after the debate ended are dropped
//! - 1.1.0: Async driver with per-countdown intervals
//! - 1.0.0: Initial state machine

pub mod clock;
pub mod driver;
pub mod machine;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use clock::{ClockSnapshot, Countdown, SessionClock, TickOutcome, TimerKind};
pub use driver::{SessionDriver, SessionReport, UserAction};
pub use machine::{
    Command, DebateSession, Phase, SessionConfig, EXCHANGE_ERROR_TEXT, FORFEIT_PROMPT,
    START_ERROR_TEXT,
};
pub use view::{Destination, SessionView};
