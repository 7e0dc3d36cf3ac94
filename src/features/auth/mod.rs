//! # Auth Feature
//!
//! Login, registration and logout against the debate backend.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod forms;

pub use forms::{
    format_login_errors, format_register_errors, submit_login, submit_logout, submit_register,
    AuthError, LoginForm, UNEXPECTED_ERROR_TEXT,
};
