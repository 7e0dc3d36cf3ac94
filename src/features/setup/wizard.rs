//! # Setup Wizard
//!
//! Three steps before a debate exists: pick a category, pick a topic, then
//! choose difficulty and time budget. Creating the debate is the last step.

use log::{debug, info, warn};
use std::sync::Arc;
use thiserror::Error;

use crate::api::{CatalogApi, Category, CreateDebateRequest, Debate, Difficulty, Topic};

/// Total budget choices in minutes
pub const TIME_CHOICES: [u32; 4] = [5, 10, 15, 20];
pub const DEFAULT_TIME_MINUTES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SetupStep {
    Category = 1,
    Topic = 2,
    Settings = 3,
}

impl SetupStep {
    pub fn number(&self) -> u8 {
        *self as u8
    }
}

/// User-facing setup errors; `Display` is the text to show
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("Please select a category first.")]
    CategoryRequired,
    #[error("Please select a topic first.")]
    TopicRequired,
    #[error("Please select a debate topic.")]
    TopicMissing,
    #[error("Time limit must be 5, 10, 15, or 20 minutes")]
    InvalidTime(u32),
    #[error("That category is not available.")]
    UnknownCategory(u64),
    #[error("That topic is not available.")]
    UnknownTopic(u64),
    #[error("Failed to load debate categories. Please refresh the page.")]
    CategoriesUnavailable,
    #[error("Failed to load topics. Please try again.")]
    TopicsUnavailable,
    #[error("{0}")]
    Create(String),
}

pub struct SetupWizard<A: CatalogApi> {
    api: Arc<A>,
    step: SetupStep,
    categories: Vec<Category>,
    topics: Vec<Topic>,
    selected_category: Option<u64>,
    selected_topic: Option<u64>,
    difficulty: Difficulty,
    time_minutes: u32,
    guest_warning_visible: bool,
}

impl<A: CatalogApi> SetupWizard<A> {
    /// Guests start with the one-free-debate warning showing
    pub fn new(api: Arc<A>, authenticated: bool) -> Self {
        SetupWizard {
            api,
            step: SetupStep::Category,
            categories: Vec::new(),
            topics: Vec::new(),
            selected_category: None,
            selected_topic: None,
            difficulty: Difficulty::default(),
            time_minutes: DEFAULT_TIME_MINUTES,
            guest_warning_visible: !authenticated,
        }
    }

    pub async fn load_categories(&mut self) -> Result<&[Category], SetupError> {
        match self.api.list_categories().await {
            Ok(categories) => {
                debug!("Loaded {} categories", categories.len());
                self.categories = categories;
                Ok(&self.categories)
            }
            Err(e) => {
                warn!("Error loading categories: {}", e);
                Err(SetupError::CategoriesUnavailable)
            }
        }
    }

    /// Select a category and load its topics. Any previous topic choice is
    /// cleared.
    pub async fn select_category(&mut self, category_id: u64) -> Result<&[Topic], SetupError> {
        if !self.categories.iter().any(|c| c.id == category_id) {
            return Err(SetupError::UnknownCategory(category_id));
        }
        self.selected_category = Some(category_id);
        self.selected_topic = None;
        self.topics.clear();

        match self.api.list_topics(category_id).await {
            Ok(topics) => {
                debug!("Loaded {} topics for category {}", topics.len(), category_id);
                self.topics = topics;
                Ok(&self.topics)
            }
            Err(e) => {
                warn!("Error loading topics for category {}: {}", category_id, e);
                Err(SetupError::TopicsUnavailable)
            }
        }
    }

    pub fn select_topic(&mut self, topic_id: u64) -> Result<(), SetupError> {
        if !self.topics.iter().any(|t| t.id == topic_id) {
            return Err(SetupError::UnknownTopic(topic_id));
        }
        self.selected_topic = Some(topic_id);
        Ok(())
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn select_time(&mut self, minutes: u32) -> Result<(), SetupError> {
        if !TIME_CHOICES.contains(&minutes) {
            return Err(SetupError::InvalidTime(minutes));
        }
        self.time_minutes = minutes;
        Ok(())
    }

    pub fn go_to_step(&mut self, step: SetupStep) -> Result<(), SetupError> {
        if step >= SetupStep::Topic && self.selected_category.is_none() {
            return Err(SetupError::CategoryRequired);
        }
        if step == SetupStep::Settings && self.selected_topic.is_none() {
            return Err(SetupError::TopicRequired);
        }
        self.step = step;
        Ok(())
    }

    /// Percent of the wizard completed, rounded down
    pub fn progress_percent(&self) -> u8 {
        (self.step.number() as u32 * 100 / 3) as u8
    }

    /// Check the selections and build the creation request. A missing topic
    /// sends the wizard back to the topic step.
    pub fn validate(&mut self) -> Result<CreateDebateRequest, SetupError> {
        let Some(topic) = self.selected_topic else {
            if self.selected_category.is_some() {
                self.step = SetupStep::Topic;
            }
            return Err(SetupError::TopicMissing);
        };
        if !TIME_CHOICES.contains(&self.time_minutes) {
            self.step = SetupStep::Settings;
            return Err(SetupError::InvalidTime(self.time_minutes));
        }
        Ok(CreateDebateRequest {
            topic,
            difficulty_level: self.difficulty,
            total_time_limit: self.time_minutes,
        })
    }

    pub async fn create_debate(&mut self) -> Result<Debate, SetupError> {
        let request = self.validate()?;
        info!("Creating debate: {:?}", request);

        match self.api.create_debate(&request).await {
            Ok(debate) => {
                info!("Debate {} created", debate.id);
                Ok(debate)
            }
            Err(e) => {
                warn!("Error creating debate: {}", e);
                Err(SetupError::Create(
                    e.server_message()
                        .unwrap_or_else(|| "Failed to create debate".to_string()),
                ))
            }
        }
    }

    pub fn dismiss_guest_warning(&mut self) {
        self.guest_warning_visible = false;
    }

    pub fn guest_warning_visible(&self) -> bool {
        self.guest_warning_visible
    }

    pub fn step(&self) -> SetupStep {
        self.step
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn selected_topic(&self) -> Option<&Topic> {
        self.selected_topic
            .and_then(|id| self.topics.iter().find(|t| t.id == id))
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn time_minutes(&self) -> u32 {
        self.time_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ApiError;
    use crate::features::session::testing::{ApiCall, ScriptedApi};
    use reqwest::StatusCode;

    fn catalogue() -> ScriptedApi {
        ScriptedApi {
            categories: vec![
                Category {
                    id: 1,
                    name: "Technology".into(),
                    description: String::new(),
                    topics_count: 2,
                },
                Category {
                    id: 2,
                    name: "Ethics".into(),
                    description: String::new(),
                    topics_count: 1,
                },
            ],
            topics: vec![
                Topic {
                    id: 11,
                    category: 1,
                    category_name: "Technology".into(),
                    title: "AI in schools".into(),
                    description: String::new(),
                    difficulty_level: Difficulty::Easy,
                },
                Topic {
                    id: 12,
                    category: 1,
                    category_name: "Technology".into(),
                    title: "Remote work".into(),
                    description: String::new(),
                    difficulty_level: Difficulty::Medium,
                },
                Topic {
                    id: 21,
                    category: 2,
                    category_name: "Ethics".into(),
                    title: "Zoos".into(),
                    description: String::new(),
                    difficulty_level: Difficulty::Hard,
                },
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_defaults_and_guest_warning() {
        let wizard = SetupWizard::new(Arc::new(catalogue()), false);
        assert_eq!(wizard.step(), SetupStep::Category);
        assert_eq!(wizard.difficulty(), Difficulty::Medium);
        assert_eq!(wizard.time_minutes(), 10);
        assert!(wizard.guest_warning_visible());
        assert_eq!(wizard.progress_percent(), 33);

        let signed_in = SetupWizard::new(Arc::new(catalogue()), true);
        assert!(!signed_in.guest_warning_visible());
    }

    #[tokio::test]
    async fn test_steps_require_selections() {
        let mut wizard = SetupWizard::new(Arc::new(catalogue()), true);
        assert_eq!(wizard.go_to_step(SetupStep::Topic), Err(SetupError::CategoryRequired));

        wizard.load_categories().await.unwrap();
        wizard.select_category(1).await.unwrap();
        wizard.go_to_step(SetupStep::Topic).unwrap();
        assert_eq!(wizard.go_to_step(SetupStep::Settings), Err(SetupError::TopicRequired));

        wizard.select_topic(12).unwrap();
        wizard.go_to_step(SetupStep::Settings).unwrap();
        assert_eq!(wizard.progress_percent(), 100);

        wizard.go_to_step(SetupStep::Category).unwrap();
        assert_eq!(wizard.step(), SetupStep::Category);
    }

    #[tokio::test]
    async fn test_changing_category_clears_topic() {
        let api = Arc::new(catalogue());
        let mut wizard = SetupWizard::new(api.clone(), true);
        wizard.load_categories().await.unwrap();

        let topics = wizard.select_category(1).await.unwrap();
        assert_eq!(topics.len(), 2);
        wizard.select_topic(11).unwrap();
        assert_eq!(wizard.selected_topic().unwrap().title, "AI in schools");

        wizard.select_category(2).await.unwrap();
        assert!(wizard.selected_topic().is_none());
        assert_eq!(wizard.select_topic(11), Err(SetupError::UnknownTopic(11)));
        assert_eq!(
            api.calls(),
            vec![ApiCall::ListCategories, ApiCall::ListTopics(1), ApiCall::ListTopics(2)]
        );
    }

    #[tokio::test]
    async fn test_unknown_category_and_bad_time() {
        let mut wizard = SetupWizard::new(Arc::new(catalogue()), true);
        wizard.load_categories().await.unwrap();
        assert_eq!(
            wizard.select_category(99).await.unwrap_err(),
            SetupError::UnknownCategory(99)
        );
        assert_eq!(wizard.select_time(7), Err(SetupError::InvalidTime(7)));
        assert_eq!(wizard.time_minutes(), 10);
        wizard.select_time(20).unwrap();
        assert_eq!(wizard.time_minutes(), 20);
    }

    #[tokio::test]
    async fn test_catalogue_outage_messages() {
        let api = ScriptedApi {
            catalogue_down: true,
            ..catalogue()
        };
        let mut wizard = SetupWizard::new(Arc::new(api), true);
        let err = wizard.load_categories().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to load debate categories. Please refresh the page."
        );
    }

    #[tokio::test]
    async fn test_validate_without_topic_goes_back() {
        let mut wizard = SetupWizard::new(Arc::new(catalogue()), true);
        wizard.load_categories().await.unwrap();
        wizard.select_category(1).await.unwrap();
        assert_eq!(wizard.validate(), Err(SetupError::TopicMissing));
        assert_eq!(wizard.step(), SetupStep::Topic);
    }

    #[tokio::test]
    async fn test_create_debate_sends_selection() {
        let api = Arc::new(catalogue());
        let mut wizard = SetupWizard::new(api.clone(), true);
        wizard.load_categories().await.unwrap();
        wizard.select_category(1).await.unwrap();
        wizard.select_topic(11).unwrap();
        wizard.select_difficulty(Difficulty::Hard);
        wizard.select_time(15).unwrap();

        let debate = wizard.create_debate().await.unwrap();
        assert_eq!(debate.total_time_limit, 15);
        assert_eq!(debate.reply_time_limit, 45);
        assert!(api.calls().contains(&ApiCall::CreateDebate(CreateDebateRequest {
            topic: 11,
            difficulty_level: Difficulty::Hard,
            total_time_limit: 15,
        })));
    }

    #[tokio::test]
    async fn test_create_debate_surfaces_backend_error() {
        let api = catalogue();
        *api.create_error.lock().unwrap() = Some(ApiError::Status {
            status: StatusCode::FORBIDDEN,
            body: r#"{"error": "Guest users can only have one free debate. Please register to continue."}"#
                .to_string(),
        });
        let mut wizard = SetupWizard::new(Arc::new(api), false);
        wizard.load_categories().await.unwrap();
        wizard.select_category(2).await.unwrap();
        wizard.select_topic(21).unwrap();

        let err = wizard.create_debate().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Guest users can only have one free debate. Please register to continue."
        );
    }
}
