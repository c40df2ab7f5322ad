//! crates/mindmatters_client/src/client.rs
//!
//! Typed calls for every REST endpoint. Each request carries the headers the
//! session cache builds. A 401 from a session-authenticated endpoint ends the
//! session; a 401 from login or register only reports bad credentials.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    cache::{Session, SessionCache},
    error::{ClientError, ClientResult},
    types::{
        Assessment, AuthResponse, ChatMessage, ChatReply, JournalEntry, Me, MessageBody,
        MoodTrend, NewJournalEntry, SubmittedAssessment,
    },
};

/// What a 401 means for the request that got it.
#[derive(Clone, Copy, PartialEq, Eq)]
enum OnUnauthorized {
    /// The cached token was rejected.
    EndSession,
    /// The submitted credentials were rejected; any existing session stays.
    Report,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionCache>,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:5000`.
    pub fn new(base_url: impl Into<String>, session: Arc<SessionCache>) -> ClientResult<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionCache> {
        &self.session
    }

    //=========================================================================================
    // Auth
    //=========================================================================================

    pub async fn register(&self, name: &str, email: &str, password: &str) -> ClientResult<Session> {
        let body = json!({ "name": name, "email": email, "password": password });
        let auth: AuthResponse = self
            .dispatch(Method::POST, "/auth/register", Some(body), OnUnauthorized::Report)
            .await?;
        self.start_session(auth)
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let body = json!({ "email": email, "password": password });
        let auth: AuthResponse = self
            .dispatch(Method::POST, "/auth/login", Some(body), OnUnauthorized::Report)
            .await?;
        self.start_session(auth)
    }

    /// Local only; tokens are not revocable server-side.
    pub fn logout(&self) -> ClientResult<()> {
        self.session.logout()
    }

    pub async fn me(&self) -> ClientResult<Me> {
        self.send(Method::GET, "/auth/me", None).await
    }

    fn start_session(&self, auth: AuthResponse) -> ClientResult<Session> {
        self.session.login(&auth.token, auth.user.clone())?;
        debug!("Signed in as user {}", auth.user.id);
        Ok(Session {
            token: auth.token,
            user: auth.user,
        })
    }

    //=========================================================================================
    // Journal
    //=========================================================================================

    pub async fn list_entries(&self) -> ClientResult<Vec<JournalEntry>> {
        self.send(Method::GET, "/journal", None).await
    }

    pub async fn get_entry(&self, id: i64) -> ClientResult<JournalEntry> {
        self.send(Method::GET, &format!("/journal/{}", id), None).await
    }

    pub async fn create_entry(&self, entry: &NewJournalEntry) -> ClientResult<JournalEntry> {
        let body = serde_json::to_value(entry)?;
        self.send(Method::POST, "/journal", Some(body)).await
    }

    pub async fn update_entry(&self, id: i64, entry: &NewJournalEntry) -> ClientResult<JournalEntry> {
        let body = serde_json::to_value(entry)?;
        self.send(Method::PUT, &format!("/journal/{}", id), Some(body)).await
    }

    /// Returns the server's confirmation message.
    pub async fn delete_entry(&self, id: i64) -> ClientResult<String> {
        let body: MessageBody = self
            .send(Method::DELETE, &format!("/journal/{}", id), None)
            .await?;
        Ok(body.message)
    }

    pub async fn mood_trends(&self) -> ClientResult<Vec<MoodTrend>> {
        self.send(Method::GET, "/journal/analytics/mood-trends", None)
            .await
    }

    //=========================================================================================
    // Chat
    //=========================================================================================

    pub async fn chat(&self, message: &str) -> ClientResult<ChatReply> {
        let body = json!({ "message": message });
        self.send(Method::POST, "/journal/chat", Some(body)).await
    }

    pub async fn chat_history(&self) -> ClientResult<Vec<ChatMessage>> {
        self.send(Method::GET, "/journal/chat/history", None).await
    }

    //=========================================================================================
    // Assessments
    //=========================================================================================

    pub async fn submit_assessment(&self, score: i32) -> ClientResult<SubmittedAssessment> {
        let body = json!({ "score": score });
        self.send(Method::POST, "/assessment", Some(body)).await
    }

    pub async fn assessment_history(&self) -> ClientResult<Vec<Assessment>> {
        self.send(Method::GET, "/assessment/history", None).await
    }

    /// `None` when the user has not taken an assessment yet.
    pub async fn latest_assessment(&self) -> ClientResult<Option<Assessment>> {
        match self.send(Method::GET, "/assessment/latest", None).await {
            Ok(assessment) => Ok(Some(assessment)),
            Err(ClientError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    //=========================================================================================
    // Transport
    //=========================================================================================

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<T> {
        self.dispatch(method, path, body, OnUnauthorized::EndSession)
            .await
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        on_unauthorized: OnUnauthorized,
    ) -> ClientResult<T> {
        let url = format!("{}/api{}", self.base_url, path);
        let mut request = self
            .http
            .request(method, &url)
            .headers(self.session.auth_headers()?);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = error_message(status, response.text().await.unwrap_or_default());
        if status == StatusCode::UNAUTHORIZED && on_unauthorized == OnUnauthorized::EndSession {
            warn!("Server rejected the session ({}); signing out", message);
            self.session.logout()?;
            return Err(ClientError::SessionExpired(message));
        }
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// The server's `{ "message": .. }` body, or failing that the raw text or
/// the status reason.
fn error_message(status: StatusCode, body: String) -> String {
    if let Ok(parsed) = serde_json::from_str::<MessageBody>(&body) {
        return parsed.message;
    }
    if !body.trim().is_empty() {
        return body;
    }
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}
