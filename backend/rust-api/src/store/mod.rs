//! Session and response persistence.
//!
//! The scoring core never talks to a store directly; services load data
//! through [`SessionStore`] and hand plain values to the scorer.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Modality, NewResponse, ResponseRecord, Session, SessionUpdate, TestStats, TestType,
};

pub mod memory;

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend could not be reached or refused the operation. Not retried.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Allocates a session with a fresh id, no scores and no completion time.
    async fn create_session(&self, test_type: TestType) -> Result<Session, StoreError>;

    async fn get_session(&self, session_id: &str) -> Result<Option<Session>, StoreError>;

    /// Merges `update` into an existing session. `Ok(None)` if the session
    /// does not exist.
    async fn update_session(
        &self,
        session_id: &str,
        update: SessionUpdate,
    ) -> Result<Option<Session>, StoreError>;

    /// Appends a response. Repeated (session, modality, stimulus) triples are
    /// expected and never rejected.
    async fn add_response(&self, response: NewResponse) -> Result<ResponseRecord, StoreError>;

    /// Responses for a session in insertion order, optionally narrowed to one
    /// modality.
    async fn get_responses(
        &self,
        session_id: &str,
        modality: Option<Modality>,
    ) -> Result<Vec<ResponseRecord>, StoreError>;

    async fn stats(&self) -> Result<TestStats, StoreError>;

    /// Liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str;
}
