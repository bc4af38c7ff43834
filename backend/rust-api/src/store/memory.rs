use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SessionStore, StoreError};
use crate::metrics::track_store_operation;
use crate::models::{
    Modality, NewResponse, ResponseRecord, Session, SessionUpdate, TestStats, TestType,
};

/// Volatile store: everything lives for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<String, Session>,
    responses: Vec<ResponseRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, test_type: TestType) -> Result<Session, StoreError> {
        track_store_operation("create_session", async move {
            let session = Session::new(test_type);
            let mut inner = self.inner.write().await;
            inner
                .sessions
                .insert(session.session_id.clone(), session.clone());
            Ok(session)
        })
        .await
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        track_store_operation("get_session", async move {
            let inner = self.inner.read().await;
            Ok(inner.sessions.get(session_id).cloned())
        })
        .await
    }

    async fn update_session(
        &self,
        session_id: &str,
        update: SessionUpdate,
    ) -> Result<Option<Session>, StoreError> {
        track_store_operation("update_session", async move {
            let mut inner = self.inner.write().await;
            Ok(inner.sessions.get_mut(session_id).map(|session| {
                session.apply(update);
                session.clone()
            }))
        })
        .await
    }

    async fn add_response(&self, response: NewResponse) -> Result<ResponseRecord, StoreError> {
        track_store_operation("add_response", async move {
            let record = ResponseRecord {
                id: Uuid::new_v4().to_string(),
                session_id: response.session_id,
                modality: response.modality,
                stimulus: response.stimulus,
                response: response.response,
                response_time: response.response_time,
                attempt: response.attempt,
                timestamp: Utc::now(),
            };
            let mut inner = self.inner.write().await;
            inner.responses.push(record.clone());
            Ok(record)
        })
        .await
    }

    async fn get_responses(
        &self,
        session_id: &str,
        modality: Option<Modality>,
    ) -> Result<Vec<ResponseRecord>, StoreError> {
        track_store_operation("get_responses", async move {
            let inner = self.inner.read().await;
            Ok(inner
                .responses
                .iter()
                .filter(|r| r.session_id == session_id)
                .filter(|r| modality.map_or(true, |m| r.modality == m))
                .cloned()
                .collect())
        })
        .await
    }

    async fn stats(&self) -> Result<TestStats, StoreError> {
        track_store_operation("stats", async move {
            let inner = self.inner.read().await;
            Ok(TestStats::from_sessions(inner.sessions.values()))
        })
        .await
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
