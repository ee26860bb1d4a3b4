//! Shared helpers for end-to-end API tests over an in-memory SQLite database.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use booking_api::api::{create_router, AppState};
use booking_api::config::Config;
use booking_api::errors::{AppError, AppResult};
use booking_api::infra::{Database, EmailDispatcher, EmailMessage, LogMailer};

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";

/// Dispatcher whose relay is always down.
pub struct UnreachableMailer;

#[async_trait]
impl EmailDispatcher for UnreachableMailer {
    async fn send(&self, _message: EmailMessage) -> AppResult<()> {
        Err(AppError::dispatch("connection refused"))
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Fresh database with a logging mail channel.
    pub async fn new() -> Self {
        Self::with_dispatcher(Arc::new(LogMailer::new("noreply@example.com"))).await
    }

    pub async fn with_dispatcher(dispatcher: Arc<dyn EmailDispatcher>) -> Self {
        let config = Config::new("sqlite::memory:", TEST_SECRET).expect("valid config");
        let database = Database::connect(&config.database_url)
            .await
            .expect("in-memory database");
        let state = AppState::with_dispatcher(Arc::new(database), &config, dispatcher);
        let router = create_router(state.clone(), Duration::from_secs(10));
        Self { router, state }
    }

    pub async fn request(
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
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    /// Register an account; returns (user id, token).
    pub async fn register(&self, username: &str, email: &str) -> (String, String) {
        let (status, body) = self
            .post(
                "/auth/register",
                None,
                serde_json::json!({ "username": username, "email": email, "password": "secret123" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        (
            body["id"].as_str().expect("id").to_string(),
            body["token"].as_str().expect("token").to_string(),
        )
    }

    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/auth/login",
                None,
                serde_json::json!({ "email": email, "password": "secret123" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().expect("token").to_string()
    }

    /// Register an account, grant it the admin role and return a fresh admin token.
    pub async fn admin(&self) -> String {
        self.register("admin", "admin@example.com").await;
        self.state
            .user_service
            .promote("admin@example.com")
            .await
            .expect("promote");
        self.login("admin@example.com").await
    }
}
