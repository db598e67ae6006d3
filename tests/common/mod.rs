#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::ServiceExt;

use stores_api::config::AppConfig;
use stores_api::database::DatabaseManager;
use stores_api::services::{Email, EmailError, EmailQueue, Mailer};
use stores_api::{app, AppState};

/// Mailer that keeps every delivered message for inspection
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<Email>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, _from: &str, email: &Email) -> Result<(), EmailError> {
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}

/// In-process application backed by a private in-memory database
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.bcrypt_cost = 4;
    config.api.enable_request_logging = false;
    config
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: AppConfig) -> Result<Self> {
        let pool = DatabaseManager::connect_in_memory().await?;
        DatabaseManager::migrate(&pool).await?;

        let mailer = Arc::new(RecordingMailer::default());
        let (email, _worker) = EmailQueue::start(mailer.clone(), "test@localhost".to_string(), 16);
        let state = AppState::new(pool, config, email)?;

        Ok(Self {
            router: app(state.clone()),
            state,
            mailer,
        })
    }

    /// Send a request and return the status with the parsed JSON body
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };
        Ok((status, value))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<StatusCode> {
        let (status, _) = self
            .post("/register", None, json!({ "username": username, "password": password }))
            .await?;
        Ok(status)
    }

    /// Register then log in, returning (access_token, refresh_token)
    pub async fn login_as(&self, username: &str) -> Result<(String, String)> {
        self.register(username, "secret-pw").await?;
        let (status, body) = self
            .post("/login", None, json!({ "username": username, "password": "secret-pw" }))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);

        let access = body["data"]["access_token"].as_str().context("access_token")?;
        let refresh = body["data"]["refresh_token"].as_str().context("refresh_token")?;
        Ok((access.to_string(), refresh.to_string()))
    }

    /// Poll the mailer until `count` messages arrived or a second passed
    pub async fn wait_for_emails(&self, count: usize) -> Vec<Email> {
        for _ in 0..50 {
            let sent = self.mailer.sent.lock().await;
            if sent.len() >= count {
                return sent.clone();
            }
            drop(sent);
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.mailer.sent.lock().await.clone()
    }
}

/// Create a store and return its id
pub async fn create_store(app: &TestApp, token: &str, name: &str) -> Result<i64> {
    let (status, body) = app.post("/store", Some(token), json!({ "name": name })).await?;
    anyhow::ensure!(status == StatusCode::CREATED, "store create failed: {} {}", status, body);
    body["data"]["id"].as_i64().context("store id")
}

/// Create an item and return its id
pub async fn create_item(app: &TestApp, token: &str, store_id: i64, name: &str, price: f64) -> Result<i64> {
    let (status, body) = app
        .post(
            "/item",
            Some(token),
            json!({ "name": name, "price": price, "store_id": store_id }),
        )
        .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "item create failed: {} {}", status, body);
    body["data"]["id"].as_i64().context("item id")
}

/// Create a tag in a store and return its id
pub async fn create_tag(app: &TestApp, token: &str, store_id: i64, name: &str) -> Result<i64> {
    let (status, body) = app
        .post(&format!("/store/{}/tag", store_id), Some(token), json!({ "name": name }))
        .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "tag create failed: {} {}", status, body);
    body["data"]["id"].as_i64().context("tag id")
}
