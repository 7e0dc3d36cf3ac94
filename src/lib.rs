// Core layer - configuration, errors, text helpers
pub mod core;

// API layer - backend client and wire models
pub mod api;

// Features layer - auth, setup wizard, debate room
pub mod features;

// Re-export core config for convenience
pub use core::Config;

// Re-export feature items
pub use features::{
    // Auth
    AuthError, LoginForm,
    // Debate room
    DebateSession, SessionConfig, SessionDriver, SessionView, UserAction,
    // Setup
    SetupError, SetupWizard,
};

// Re-export API items
pub use api::{CatalogApi, DebateApi, HttpDebateApi};
