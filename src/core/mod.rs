//! # Core Module
//!
//! Configuration, error taxonomy and text helpers shared by every feature.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add display module with clock formatting and wrapping
//! - 1.0.0: Initial creation with config and error modules

pub mod config;
pub mod display;
pub mod error;

// Re-export commonly used items
pub use config::Config;
pub use display::{format_clock, truncate, wrap_text, TERMINAL_WIDTH};
pub use error::{ApiError, SessionFailure};
