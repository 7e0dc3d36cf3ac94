//! Test doubles for the session and setup features

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::api::{
    ActionKind, CatalogApi, Category, CreateDebateRequest, Debate, DebateAction, DebateApi,
    DebateStatus, Message, Sender, Topic, Winner,
};
use crate::core::ApiError;
use crate::features::session::clock::ClockSnapshot;
use crate::features::session::view::{Destination, SessionView};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ViewEvent {
    Message(Message),
    Clock(ClockSnapshot),
    StartEnabled(bool),
    InputEnabled(bool),
    Typing(bool),
    Notice(String),
    Navigate(Destination),
}

/// Records every view call; clones share the same log
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingView {
    events: Arc<Mutex<Vec<ViewEvent>>>,
}

impl RecordingView {
    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    fn last_flag(&self, pick: impl Fn(&ViewEvent) -> Option<bool>) -> bool {
        self.events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(pick)
            .unwrap_or(false)
    }

    pub fn input_enabled(&self) -> bool {
        self.last_flag(|e| match e {
            ViewEvent::InputEnabled(v) => Some(*v),
            _ => None,
        })
    }

    pub fn start_enabled(&self) -> bool {
        self.last_flag(|e| match e {
            ViewEvent::StartEnabled(v) => Some(*v),
            _ => None,
        })
    }

    pub fn typing(&self) -> bool {
        self.last_flag(|e| match e {
            ViewEvent::Typing(v) => Some(*v),
            _ => None,
        })
    }

    pub fn notices(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Notice(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn rendered(&self) -> Vec<Message> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Message(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }
}

impl SessionView for RecordingView {
    fn render_message(&mut self, message: &Message) {
        self.push(ViewEvent::Message(message.clone()));
    }

    fn update_clock(&mut self, clock: ClockSnapshot) {
        self.push(ViewEvent::Clock(clock));
    }

    fn set_start_enabled(&mut self, enabled: bool) {
        self.push(ViewEvent::StartEnabled(enabled));
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.push(ViewEvent::InputEnabled(enabled));
    }

    fn set_typing(&mut self, typing: bool) {
        self.push(ViewEvent::Typing(typing));
    }

    fn notify(&mut self, notice: &str) {
        self.push(ViewEvent::Notice(notice.to_string()));
    }

    fn navigate(&mut self, destination: &Destination) {
        self.push(ViewEvent::Navigate(*destination));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ApiCall {
    Start,
    End(Winner),
    PostMessage(String),
    AiResponse(String),
    ListCategories,
    ListTopics(u64),
    CreateDebate(CreateDebateRequest),
}

pub(crate) fn server_error() -> ApiError {
    ApiError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: r#"{"error": "boom"}"#.to_string(),
    }
}

pub(crate) fn debate_stub(id: u64, status: DebateStatus) -> Debate {
    Debate {
        id,
        topic: Some(11),
        topic_title: Some("AI in schools".to_string()),
        topic_description: None,
        category_name: Some("Technology".to_string()),
        difficulty_level: None,
        total_time_limit: 10,
        reply_time_limit: 60,
        status,
        winner: None,
        is_guest: false,
        user_messages_count: 0,
        ai_messages_count: 0,
        messages: Vec::new(),
    }
}

/// In-memory backend with scripted failures
#[derive(Default)]
pub(crate) struct ScriptedApi {
    pub calls: Mutex<Vec<ApiCall>>,
    pub start_failures: Mutex<usize>,
    pub post_failures: Mutex<usize>,
    pub ai_replies: Mutex<VecDeque<Result<Message, ApiError>>>,
    pub fail_end: bool,
    pub categories: Vec<Category>,
    pub topics: Vec<Topic>,
    pub create_error: Mutex<Option<ApiError>>,
    pub catalogue_down: bool,
}

impl ScriptedApi {
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn take_failure(counter: &Mutex<usize>) -> bool {
        let mut remaining = counter.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
            true
        } else {
            false
        }
    }
}

#[async_trait]
impl DebateApi for ScriptedApi {
    async fn update_debate(&self, debate_id: u64, action: DebateAction) -> Result<Debate, ApiError> {
        match action.action {
            ActionKind::Start => {
                self.record(ApiCall::Start);
                if Self::take_failure(&self.start_failures) {
                    return Err(server_error());
                }
                Ok(debate_stub(debate_id, DebateStatus::Active))
            }
            ActionKind::End => {
                let winner = action.winner.unwrap_or(Winner::Ai);
                self.record(ApiCall::End(winner));
                if self.fail_end {
                    return Err(server_error());
                }
                let mut debate = debate_stub(debate_id, DebateStatus::Ended);
                debate.winner = Some(winner);
                Ok(debate)
            }
        }
    }

    async fn post_message(&self, _debate_id: u64, content: &str, _sender: Sender) -> Result<(), ApiError> {
        self.record(ApiCall::PostMessage(content.to_string()));
        if Self::take_failure(&self.post_failures) {
            return Err(server_error());
        }
        Ok(())
    }

    async fn request_ai_response(&self, _debate_id: u64, user_message: &str) -> Result<Message, ApiError> {
        self.record(ApiCall::AiResponse(user_message.to_string()));
        self.ai_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Message::new(Sender::Ai, "Noted.")))
    }
}

#[async_trait]
impl CatalogApi for ScriptedApi {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.record(ApiCall::ListCategories);
        if self.catalogue_down {
            return Err(server_error());
        }
        Ok(self.categories.clone())
    }

    async fn list_topics(&self, category_id: u64) -> Result<Vec<Topic>, ApiError> {
        self.record(ApiCall::ListTopics(category_id));
        if self.catalogue_down {
            return Err(server_error());
        }
        Ok(self
            .topics
            .iter()
            .filter(|t| t.category == category_id)
            .cloned()
            .collect())
    }

    async fn create_debate(&self, request: &CreateDebateRequest) -> Result<Debate, ApiError> {
        self.record(ApiCall::CreateDebate(request.clone()));
        if let Some(err) = self.create_error.lock().unwrap().take() {
            return Err(err);
        }
        let mut debate = debate_stub(100, DebateStatus::Pending);
        debate.topic = Some(request.topic);
        debate.difficulty_level = Some(request.difficulty_level);
        debate.total_time_limit = request.total_time_limit;
        debate.reply_time_limit = request.difficulty_level.reply_budget_secs();
        Ok(debate)
    }
}
