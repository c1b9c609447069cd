use std::time::Duration;

use chrono::Utc;
use reqwest::header::COOKIE;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::dto::envelope;
use super::dto::{
    BoardRecord, CardPatch, CreateBoardRequest, CreateProjectRequest, Credentials, Envelope,
    NewCard, ProjectListing, ProjectResponse, Registration, UpdateBoardRequest,
    UpdateProfileRequest, User,
};
use super::BoardApi;
use crate::auth::Session;
use crate::config::Config;
use crate::domain::validation::{validate_credentials, validate_nickname};
use crate::domain::{BoardId, Card, CardId, KanbanError, Project, ProjectId};

const REFRESH_COOKIE: &str = "refresh_token";

#[derive(Debug, Clone)]
pub struct HttpBoardApi {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpBoardApi {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, KanbanError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(base_url, builder.build()?))
    }

    pub fn from_config(config: &Config) -> Result<Self, KanbanError> {
        Self::new(&config.api_url, config.request_timeout())
    }

    pub fn with_client(base_url: &str, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client
            .request(method, format!("{}{}", self.base_url, path))
    }

    // ── Account ───────────────────────────────────────────────

    /// Signs in. The refresh credential comes back both in the body and as
    /// the `refresh_token` cookie; either one is kept on the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, KanbanError> {
        let request = self
            .request(Method::POST, "/users/auth")
            .json(&Credentials { email, password });
        let response = self.dispatch(request).await?;
        let cookie = response
            .cookies()
            .find(|c| c.name() == REFRESH_COOKIE)
            .map(|c| c.value().to_string());
        let value: Value = serde_json::from_str(&response.text().await?)?;

        let session = session_from(&value)?;
        match envelope::refresh_token(&value).map(str::to_string).or(cookie) {
            Some(refresh_token) => Ok(session.with_refresh_token(refresh_token)),
            None => {
                tracing::warn!("Login response carried no refresh token");
                Ok(session)
            }
        }
    }

    /// Trades the refresh credential for a new access token. The access
    /// token is not consulted, so this works after it has expired.
    pub async fn refresh(&self, session: &Session) -> Result<Session, KanbanError> {
        let refresh_token = session.refresh_token().ok_or_else(|| {
            KanbanError::Unauthorized("no refresh token, sign in again".into())
        })?;
        let request = self
            .request(Method::POST, "/refresh")
            .bearer_auth(refresh_token)
            .header(COOKIE, format!("{REFRESH_COOKIE}={refresh_token}"));
        let response = self.dispatch(request).await?;
        let value: Value = serde_json::from_str(&response.text().await?)?;

        let renewed = session_from(&value)?;
        let refresh_token = envelope::refresh_token(&value).unwrap_or(refresh_token);
        tracing::debug!(subject = renewed.subject(), "Access token refreshed");
        Ok(renewed.with_refresh_token(refresh_token))
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Registration, KanbanError> {
        validate_credentials(email, password)?;
        let request = self
            .request(Method::POST, "/users")
            .json(&Credentials { email, password });
        let raw = self.dispatch(request).await?.text().await?;
        let registration: Registration = body_of(&raw)?;
        tracing::info!(user_id = registration.user_id, "Account registered");
        Ok(registration)
    }

    pub async fn current_user(&self, session: &Session) -> Result<User, KanbanError> {
        self.send(self.request(Method::GET, "/users"), session).await
    }

    pub async fn update_profile(&self, session: &Session, nickname: &str) -> Result<User, KanbanError> {
        validate_nickname(nickname)?;
        let request = self
            .request(Method::PATCH, "/users")
            .json(&UpdateProfileRequest { nickname });
        self.send(request, session).await
    }

    /// Projects the user owns and projects they were added to.
    pub async fn list_projects(&self, session: &Session) -> Result<ProjectListing, KanbanError> {
        self.send(self.request(Method::GET, "/projects"), session).await
    }

    // ── Transport ─────────────────────────────────────────────

    /// Sends the request and maps any non-2xx status to a `KanbanError`.
    async fn dispatch(&self, request: RequestBuilder) -> Result<Response, KanbanError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("Backend request failed: {}", e);
            KanbanError::Transport(e)
        })?;
        let status = response.status();
        let url = response.url().path().to_string();

        if !status.is_success() {
            let raw = response.text().await?;
            let error = KanbanError::from_status(status.as_u16(), envelope::error_message(&raw));
            if status.is_server_error() {
                tracing::error!(status = status.as_u16(), path = url.as_str(), "Backend error: {}", error);
            } else {
                tracing::warn!(status = status.as_u16(), path = url.as_str(), "Backend rejected request: {}", error);
            }
            return Err(error);
        }

        tracing::debug!(status = status.as_u16(), path = url.as_str(), "Backend request succeeded");
        Ok(response)
    }

    async fn execute(&self, request: RequestBuilder, session: &Session) -> Result<String, KanbanError> {
        session.ensure_valid(Utc::now())?;
        let response = self
            .dispatch(request.bearer_auth(session.access_token()))
            .await?;
        Ok(response.text().await?)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        session: &Session,
    ) -> Result<T, KanbanError> {
        body_of(&self.execute(request, session).await?)
    }

    async fn send_empty(&self, request: RequestBuilder, session: &Session) -> Result<(), KanbanError> {
        self.execute(request, session).await.map(|_| ())
    }
}

fn body_of<T: DeserializeOwned>(raw: &str) -> Result<T, KanbanError> {
    let envelope: Envelope<T> = serde_json::from_str(raw)?;
    envelope
        .into_body()
        .ok_or_else(|| KanbanError::UnexpectedResponse("response body is empty".into()))
}

fn session_from(value: &Value) -> Result<Session, KanbanError> {
    envelope::access_token(value)
        .map(Session::new)
        .ok_or_else(|| KanbanError::UnexpectedResponse("no access token in response".into()))
}

impl BoardApi for HttpBoardApi {
    async fn move_card(
        &self,
        session: &Session,
        card_id: CardId,
        board_id: BoardId,
    ) -> Result<Card, KanbanError> {
        self.update_card(session, card_id, &CardPatch::move_to(board_id))
            .await
    }

    async fn fetch_project(
        &self,
        session: &Session,
        project_id: ProjectId,
    ) -> Result<ProjectResponse, KanbanError> {
        let request = self
            .request(Method::GET, "/projects")
            .query(&[("project_id", project_id)]);
        self.send(request, session).await
    }

    async fn create_project(
        &self,
        session: &Session,
        title: &str,
        description: &str,
    ) -> Result<Project, KanbanError> {
        let request = self
            .request(Method::POST, "/projects")
            .json(&CreateProjectRequest { title, description });
        self.send(request, session).await
    }

    async fn create_board(
        &self,
        session: &Session,
        project_id: ProjectId,
        title: &str,
    ) -> Result<BoardRecord, KanbanError> {
        let request = self
            .request(Method::POST, "/boards")
            .json(&CreateBoardRequest { title, project_id });
        self.send(request, session).await
    }

    async fn rename_board(
        &self,
        session: &Session,
        board_id: BoardId,
        title: &str,
    ) -> Result<BoardRecord, KanbanError> {
        let request = self
            .request(Method::PATCH, "/boards")
            .query(&[("board_id", board_id)])
            .json(&UpdateBoardRequest { title });
        self.send(request, session).await
    }

    async fn delete_board(&self, session: &Session, board_id: BoardId) -> Result<(), KanbanError> {
        let request = self
            .request(Method::DELETE, "/boards")
            .query(&[("board_id", board_id)]);
        self.send_empty(request, session).await
    }

    async fn create_card(&self, session: &Session, card: &NewCard) -> Result<Card, KanbanError> {
        let request = self.request(Method::POST, "/cards").json(card);
        self.send(request, session).await
    }

    async fn update_card(
        &self,
        session: &Session,
        card_id: CardId,
        patch: &CardPatch,
    ) -> Result<Card, KanbanError> {
        let request = self
            .request(Method::PATCH, "/cards")
            .query(&[("card_id", card_id)])
            .json(patch);
        self.send(request, session).await
    }

    async fn delete_card(&self, session: &Session, card_id: CardId) -> Result<(), KanbanError> {
        let request = self
            .request(Method::DELETE, "/cards")
            .query(&[("card_id", card_id)]);
        self.send_empty(request, session).await
    }
}
