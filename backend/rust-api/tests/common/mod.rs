#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use synesthesia_api::{
    config::Config,
    create_router,
    models::{
        Modality, NewResponse, ResponseRecord, Session, SessionUpdate, TestStats, TestType,
    },
    services::AppState,
    store::{SessionStore, StoreError},
};
use tower::ServiceExt;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Router over a fresh in-memory store, same stack as the binary.
pub fn create_test_app() -> Router {
    init_tracing();
    create_router(Arc::new(AppState::in_memory(Config::default())))
}

pub fn create_test_app_with_config(config: Config) -> Router {
    init_tracing();
    create_router(Arc::new(AppState::in_memory(config)))
}

/// Router whose store rejects every operation.
pub fn create_failing_app() -> Router {
    init_tracing();
    create_router(Arc::new(AppState::new(
        Config::default(),
        Arc::new(FailingStore),
    )))
}

pub struct FailingStore;

fn unavailable<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("connection refused".to_string()))
}

#[async_trait]
impl SessionStore for FailingStore {
    async fn create_session(&self, _test_type: TestType) -> Result<Session, StoreError> {
        unavailable()
    }

    async fn get_session(&self, _session_id: &str) -> Result<Option<Session>, StoreError> {
        unavailable()
    }

    async fn update_session(
        &self,
        _session_id: &str,
        _update: SessionUpdate,
    ) -> Result<Option<Session>, StoreError> {
        unavailable()
    }

    async fn add_response(&self, _response: NewResponse) -> Result<ResponseRecord, StoreError> {
        unavailable()
    }

    async fn get_responses(
        &self,
        _session_id: &str,
        _modality: Option<Modality>,
    ) -> Result<Vec<ResponseRecord>, StoreError> {
        unavailable()
    }

    async fn stats(&self) -> Result<TestStats, StoreError> {
        unavailable()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        unavailable()
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "response body is not JSON: {}",
            String::from_utf8_lossy(&body)
        )
    })
}

pub async fn body_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&body).into_owned()
}

/// Creates a session and returns its id.
pub async fn create_session(app: &Router, test_type: &str) -> String {
    let response = send(
        app,
        "POST",
        "/api/v1/sessions",
        Some(json!({ "testType": test_type })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["sessionId"].as_str().unwrap().to_string()
}

pub async fn submit(app: &Router, session_id: &str, body: Value) -> Response {
    send(
        app,
        "POST",
        &format!("/api/v1/sessions/{}/responses", session_id),
        Some(body),
    )
    .await
}

/// Submits a response and asserts it was accepted.
pub async fn submit_ok(
    app: &Router,
    session_id: &str,
    modality: &str,
    stimulus: &str,
    response: Value,
) {
    let res = submit(
        app,
        session_id,
        json!({
            "modality": modality,
            "stimulus": stimulus,
            "response": response,
            "responseTime": 1200,
        }),
    )
    .await;
    let status = res.status();
    if status != StatusCode::CREATED {
        panic!("unexpected status {} body {}", status, body_text(res).await);
    }
}
