//! # Debate API Client
//!
//! `reqwest`-backed client for the debate backend plus the two ports the
//! features talk through: [`DebateApi`] for the debate room and
//! [`CatalogApi`] for the setup wizard.

use async_trait::async_trait;
use log::debug;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::api::models::{
    AiResponse, AiResponseRequest, AuthResponse, AuthStatus, Category, CreateDebateRequest, Dashboard,
    Debate, DebateAction, HistoryEntry, LoginRequest, Message, PostMessage, RegisterRequest, Sender, Topic,
};
use crate::core::{ApiError, Config};

/// Header carrying the CSRF token on mutating calls
pub const CSRF_HEADER: &str = "X-CSRFToken";
/// Cookie the backend rotates its CSRF token through
pub const CSRF_COOKIE: &str = "csrftoken";

/// Calls the debate room needs
#[async_trait]
pub trait DebateApi: Send + Sync {
    /// `PATCH /api/debates/{id}/` with `{action, winner?}`
    async fn update_debate(&self, debate_id: u64, action: DebateAction) -> Result<Debate, ApiError>;

    /// `POST /api/debates/{id}/messages/`
    async fn post_message(&self, debate_id: u64, content: &str, sender: Sender) -> Result<(), ApiError>;

    /// `POST /api/debates/{id}/ai-response/`
    async fn request_ai_response(&self, debate_id: u64, user_message: &str) -> Result<Message, ApiError>;
}

/// Calls the setup wizard needs
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;

    async fn list_topics(&self, category_id: u64) -> Result<Vec<Topic>, ApiError>;

    async fn create_debate(&self, request: &CreateDebateRequest) -> Result<Debate, ApiError>;
}

/// HTTP implementation of both ports, plus auth and history calls
#[derive(Clone)]
pub struct HttpDebateApi {
    client: Client,
    base_url: String,
    /// Fallback when the jar holds no `csrftoken` cookie
    csrf_token: Option<String>,
    jar: Option<Arc<Jar>>,
}

impl HttpDebateApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(config.http_timeout)
            .cookie_provider(Arc::clone(&jar))
            .user_agent(concat!("debato/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut api = Self::with_client(client, &config.api_url, config.csrf_token.clone());
        api.jar = Some(jar);
        Ok(api)
    }

    /// Wrap a prebuilt client. No cookie jar is inspected, so only the
    /// static token is sent.
    pub fn with_client(client: Client, base_url: &str, csrf_token: Option<String>) -> Self {
        HttpDebateApi {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            csrf_token,
            jar: None,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Current CSRF token: the `csrftoken` cookie if the backend set one,
    /// otherwise the configured token
    fn csrf_token(&self) -> Option<String> {
        let from_cookie = self.jar.as_ref().and_then(|jar| {
            let url = Url::parse(&self.base_url).ok()?;
            let header = jar.cookies(&url)?;
            let cookies = header.to_str().ok()?;
            cookies.split(';').find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == CSRF_COOKIE).then(|| value.to_string())
            })
        });
        from_cookie.or_else(|| self.csrf_token.clone())
    }

    /// Attach the CSRF header to a mutating request
    fn mutating(&self, request: RequestBuilder) -> RequestBuilder {
        match self.csrf_token() {
            Some(token) => request.header(CSRF_HEADER, token),
            None => request,
        }
    }

    async fn send(request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Backend returned HTTP {}: {}", status, body);
            return Err(ApiError::Status { status, body });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let request = self
            .client
            .post(self.url("/api/auth/login/"))
            .json(&LoginRequest { username, password });
        Self::send_json(self.mutating(request)).await
    }

    pub async fn register(&self, form: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let request = self.client.post(self.url("/api/auth/register/")).json(form);
        Self::send_json(self.mutating(request)).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let request = self.client.post(self.url("/api/auth/logout/"));
        Self::send(self.mutating(request)).await.map(|_| ())
    }

    pub async fn auth_status(&self) -> Result<AuthStatus, ApiError> {
        Self::send_json(self.client.get(self.url("/api/auth/status/"))).await
    }

    // ------------------------------------------------------------------
    // Debates
    // ------------------------------------------------------------------

    pub async fn get_debate(&self, debate_id: u64) -> Result<Debate, ApiError> {
        Self::send_json(self.client.get(self.url(&format!("/api/debates/{debate_id}/")))).await
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        Self::send_json(self.client.get(self.url("/api/debates/history/"))).await
    }

    /// Scoreboard for signed-in users, trial state for guests
    pub async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        Self::send_json(self.client.get(self.url("/api/dashboard/"))).await
    }
}

#[async_trait]
impl DebateApi for HttpDebateApi {
    async fn update_debate(&self, debate_id: u64, action: DebateAction) -> Result<Debate, ApiError> {
        debug!("PATCH debate {} with {:?}", debate_id, action);
        let request = self
            .client
            .patch(self.url(&format!("/api/debates/{debate_id}/")))
            .json(&action);
        Self::send_json(self.mutating(request)).await
    }

    async fn post_message(&self, debate_id: u64, content: &str, sender: Sender) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.url(&format!("/api/debates/{debate_id}/messages/")))
            .json(&PostMessage { content, sender });
        Self::send(self.mutating(request)).await.map(|_| ())
    }

    async fn request_ai_response(&self, debate_id: u64, user_message: &str) -> Result<Message, ApiError> {
        let request = self
            .client
            .post(self.url(&format!("/api/debates/{debate_id}/ai-response/")))
            .json(&AiResponseRequest { user_message });
        let reply: AiResponse = Self::send_json(self.mutating(request)).await?;
        Ok(reply.message)
    }
}

#[async_trait]
impl CatalogApi for HttpDebateApi {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        Self::send_json(self.client.get(self.url("/api/categories/"))).await
    }

    async fn list_topics(&self, category_id: u64) -> Result<Vec<Topic>, ApiError> {
        let request = self
            .client
            .get(self.url("/api/topics/"))
            .query(&[("category", category_id)]);
        Self::send_json(request).await
    }

    async fn create_debate(&self, request: &CreateDebateRequest) -> Result<Debate, ApiError> {
        let builder = self.client.post(self.url("/api/debates/create/")).json(request);
        Self::send_json(self.mutating(builder)).await
    }
}
