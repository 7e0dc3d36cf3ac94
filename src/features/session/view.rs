//! Presentation port for the debate room

use crate::api::{Message, Winner};
use crate::features::session::clock::ClockSnapshot;

/// Where the user lands once a debate is over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Signed-in users go to their persistent results view
    Results { winner: Winner },
    /// Guests get the blocking "trial ended" prompt in place
    TrialEnded { winner: Winner },
}

impl Destination {
    pub fn winner(&self) -> Winner {
        match self {
            Destination::Results { winner } | Destination::TrialEnded { winner } => *winner,
        }
    }
}

/// Everything the session draws. Implementations must not call back into
/// the session.
pub trait SessionView: Send {
    fn render_message(&mut self, message: &Message);

    fn update_clock(&mut self, clock: ClockSnapshot);

    fn set_start_enabled(&mut self, enabled: bool);

    /// Message box and send control
    fn set_input_enabled(&mut self, enabled: bool);

    /// "AI is thinking..." indicator
    fn set_typing(&mut self, typing: bool);

    fn notify(&mut self, notice: &str);

    fn navigate(&mut self, destination: &Destination);
}
