//! Shared harness: the full router over an in-memory store, driven in-process.

#![allow(dead_code)]

use api_lib::{
    adapters::{FallbackChat, MemoryDatabase},
    security::TokenService,
    web::{self, AppState},
};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use mindmatters_core::ports::{ChatResponder, DatabaseService};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";

pub struct TestApp {
    pub router: Router,
    pub db: Arc<MemoryDatabase>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_chat(FallbackChat::default())
    }

    pub fn with_upstream(upstream: Arc<dyn ChatResponder>) -> Self {
        Self::with_chat(FallbackChat::new(Some(upstream)))
    }

    fn with_chat(chat: FallbackChat) -> Self {
        let db = Arc::new(MemoryDatabase::new());
        let store: Arc<dyn DatabaseService> = db.clone();
        let tokens = TokenService::new(SECRET, Duration::hours(1));
        let state = Arc::new(AppState::new(store, tokens, chat));
        Self {
            router: web::app(state),
            db,
        }
    }

    /// Sends one request and returns the status and JSON body (`Null` if empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Registers a user and returns its token and id.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> (String, i64) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "name": name, "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_i64().unwrap(),
        )
    }
}

pub fn sample_entry() -> Value {
    json!({
        "mood": "happy",
        "title": "Day 1",
        "content": "Good day",
        "tags": ["win"],
        "moodScore": 8
    })
}
