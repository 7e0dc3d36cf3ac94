//! Login and registration form submission
//!
//! Turns backend validation errors into the text shown under the form.

use log::{info, warn};
use serde_json::Value;
use thiserror::Error;

use crate::api::{AuthUser, HttpDebateApi, RegisterRequest};
use crate::core::ApiError;

pub const UNEXPECTED_ERROR_TEXT: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Backend refused the form; the text is ready to display
    #[error("{0}")]
    Rejected(String),
    #[error("An unexpected error occurred. Please try again.")]
    Unexpected,
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn submit_login(api: &HttpDebateApi, form: &LoginForm) -> Result<AuthUser, AuthError> {
    match api.login(&form.username, &form.password).await {
        Ok(response) => {
            info!("Logged in as {}", response.user.username);
            Ok(response.user)
        }
        Err(ApiError::Status { body, status }) => {
            warn!("Login rejected with HTTP {}", status);
            Err(AuthError::Rejected(format_login_errors(&body)))
        }
        Err(e) => {
            warn!("Login failed: {}", e);
            Err(AuthError::Unexpected)
        }
    }
}

pub async fn submit_register(api: &HttpDebateApi, form: &RegisterRequest) -> Result<AuthUser, AuthError> {
    match api.register(form).await {
        Ok(response) => {
            info!("Registered {}", response.user.username);
            Ok(response.user)
        }
        Err(ApiError::Status { body, status }) => {
            warn!("Registration rejected with HTTP {}", status);
            Err(AuthError::Rejected(format_register_errors(&body)))
        }
        Err(e) => {
            warn!("Registration failed: {}", e);
            Err(AuthError::Unexpected)
        }
    }
}

pub async fn submit_logout(api: &HttpDebateApi) -> Result<(), AuthError> {
    api.logout().await.map_err(|e| {
        warn!("Logout failed: {}", e);
        AuthError::Unexpected
    })
}

/// Every value of the error object, one per line
pub fn format_login_errors(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map.values().map(flatten).collect::<Vec<_>>().join("\n"),
        Ok(other) => flatten(&other),
        Err(_) => UNEXPECTED_ERROR_TEXT.to_string(),
    }
}

/// One `field: msg1, msg2` line per field
pub fn format_register_errors(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, flatten(messages)))
            .collect::<Vec<_>>()
            .join("\n"),
        Ok(other) => flatten(&other),
        Err(_) => UNEXPECTED_ERROR_TEXT.to_string(),
    }
}

fn flatten(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(flatten).collect::<Vec<_>>().join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
