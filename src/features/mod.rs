//! # Features Layer
//!
//! One module per user-facing surface of the debate client.

pub mod auth;
pub mod session;
pub mod setup;

pub use auth::{AuthError, LoginForm};
pub use session::{DebateSession, SessionConfig, SessionDriver, SessionView, UserAction};
pub use setup::{SetupError, SetupWizard};
