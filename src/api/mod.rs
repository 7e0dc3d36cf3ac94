//! # API Layer
//!
//! JSON-over-HTTP access to the debate backend.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: CSRF token read from the session cookie jar; dashboard endpoint
//! - 1.1.0: Added catalogue, history and auth endpoints
//! - 1.0.0: Initial debate room endpoints

pub mod client;
pub mod models;

pub use client::{CatalogApi, DebateApi, HttpDebateApi, CSRF_COOKIE, CSRF_HEADER};
pub use models::{
    ActionKind, AuthStatus, AuthUser, Category, CreateDebateRequest, Dashboard, Debate,
    DebateAction, DebateStatus, Difficulty, HistoryEntry, Message, RegisterRequest, Scoreboard,
    Sender, Topic, Winner,
};
