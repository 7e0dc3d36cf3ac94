//! # Debate Setup Feature
//!
//! Category, topic and settings selection ahead of debate creation.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod wizard;

pub use wizard::{SetupError, SetupStep, SetupWizard, DEFAULT_TIME_MINUTES, TIME_CHOICES};
