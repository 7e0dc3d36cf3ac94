//! # API Models
//!
//! Wire types for the debate backend. Field names follow the backend's JSON
//! exactly; conversions to session units live on the types themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Debates
// ============================================================================

/// Lifecycle status of a debate as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebateStatus {
    /// Created, not yet started
    #[serde(rename = "setup")]
    Pending,
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "completed", alias = "abandoned")]
    Ended,
}

/// Which side won a finished debate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    User,
    Ai,
}

impl Winner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::User => "user",
            Winner::Ai => "ai",
        }
    }
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `"ongoing"` and `null` both mean nobody has won yet
fn deserialize_winner<'de, D>(deserializer: D) -> Result<Option<Winner>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("ongoing") | Some("") => Ok(None),
        Some("user") => Ok(Some(Winner::User)),
        Some("ai") => Ok(Some(Winner::Ai)),
        Some(other) => Err(serde::de::Error::unknown_variant(other, &["user", "ai", "ongoing"])),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Per-reply budget the backend assigns for this difficulty
    pub fn reply_budget_secs(&self) -> u32 {
        match self {
            Difficulty::Easy => 75,
            Difficulty::Medium => 60,
            Difficulty::Hard => 45,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// A debate resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debate {
    pub id: u64,
    #[serde(default)]
    pub topic: Option<u64>,
    #[serde(default)]
    pub topic_title: Option<String>,
    #[serde(default)]
    pub topic_description: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<Difficulty>,
    /// Whole-debate budget in minutes
    pub total_time_limit: u32,
    /// Per-reply budget in seconds
    pub reply_time_limit: u32,
    pub status: DebateStatus,
    #[serde(default, deserialize_with = "deserialize_winner")]
    pub winner: Option<Winner>,
    #[serde(default)]
    pub is_guest: bool,
    #[serde(default)]
    pub user_messages_count: u32,
    #[serde(default)]
    pub ai_messages_count: u32,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Debate {
    pub fn total_budget_secs(&self) -> u32 {
        self.total_time_limit.saturating_mul(60)
    }
}

/// Body of `PATCH /api/debates/{id}/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebateAction {
    pub action: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Start,
    End,
}

impl DebateAction {
    pub fn start() -> Self {
        DebateAction { action: ActionKind::Start, winner: None }
    }

    pub fn end(winner: Winner) -> Self {
        DebateAction { action: ActionKind::End, winner: Some(winner) }
    }
}

/// Body of `POST /api/debates/create/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateDebateRequest {
    pub topic: u64,
    pub difficulty_level: Difficulty,
    /// Minutes
    pub total_time_limit: u32,
}

/// One row of `GET /api/debates/history/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    #[serde(default)]
    pub topic_title: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub difficulty_level: Option<Difficulty>,
    pub status: DebateStatus,
    #[serde(default, deserialize_with = "deserialize_winner")]
    pub winner: Option<Winner>,
    /// Minutes
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

/// Win/loss tally for a signed-in user
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scoreboard {
    pub user_wins: u32,
    pub ai_wins: u32,
    pub total_debates: u32,
    /// Percentage, two decimals
    pub win_rate: f64,
}

/// `GET /api/dashboard/`. Signed-in users get `scoreboard` and
/// `recent_debates`; guests get `can_debate` instead.
#[derive(Debug, Clone, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub available_categories: Vec<Category>,
    #[serde(default)]
    pub recent_debates: Vec<HistoryEntry>,
    #[serde(default)]
    pub scoreboard: Option<Scoreboard>,
    #[serde(default)]
    pub can_debate: Option<bool>,
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
    System,
}

impl Sender {
    pub fn display_name(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Ai => "Debato AI",
            Sender::System => "System",
        }
    }
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Message {
            sender,
            content: content.into(),
            timestamp: None,
        }
    }
}

/// Body of `POST /api/debates/{id}/messages/`
#[derive(Debug, Clone, Serialize)]
pub struct PostMessage<'a> {
    pub content: &'a str,
    pub sender: Sender,
}

/// Body of `POST /api/debates/{id}/ai-response/`
#[derive(Debug, Clone, Serialize)]
pub struct AiResponseRequest<'a> {
    pub user_message: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiResponse {
    pub message: Message,
}

// ============================================================================
// Catalogue
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub topics_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: u64,
    pub category: u64,
    #[serde(default)]
    pub category_name: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty_level: Difficulty,
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthStatus {
    pub is_authenticated: bool,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
}
