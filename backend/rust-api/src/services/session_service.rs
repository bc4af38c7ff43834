use chrono::Utc;
use std::sync::Arc;

use super::{ServiceError, SessionLocks};
use crate::metrics::{record_modality_score, SESSIONS_ACTIVE, SESSIONS_TOTAL};
use crate::models::{
    CreateSessionRequest, Session, SessionResults, SessionScores, SessionUpdate, TestStats,
};
use crate::scoring::{aggregate, recommend, score_session};
use crate::store::SessionStore;

pub struct SessionService {
    store: Arc<dyn SessionStore>,
    locks: Arc<SessionLocks>,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>, locks: Arc<SessionLocks>) -> Self {
        Self { store, locks }
    }

    pub async fn create_session(&self, req: CreateSessionRequest) -> Result<Session, ServiceError> {
        let session = self.store.create_session(req.test_type).await?;

        // Record business metrics
        SESSIONS_TOTAL.with_label_values(&["created"]).inc();
        SESSIONS_ACTIVE.inc();

        tracing::info!(
            "Session created: {} (test_type={:?})",
            session.session_id,
            session.test_type
        );

        Ok(session)
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Session, ServiceError> {
        self.store
            .get_session(session_id)
            .await?
            .ok_or_else(|| ServiceError::SessionNotFound(session_id.to_string()))
    }

    /// Scores every answered modality and writes the scores together with the
    /// completion time in a single update.
    ///
    /// Runs under the session lock. A session that is already completed is
    /// returned as stored, without rescoring.
    pub async fn complete_session(&self, session_id: &str) -> Result<Session, ServiceError> {
        // Sessions are never deleted, so existence checked here still holds
        // once the lock is taken.
        self.get_session(session_id).await?;
        let _guard = self.locks.acquire(session_id).await;

        let session = self.get_session(session_id).await?;
        if session.is_completed() {
            tracing::info!("Session {} already completed, returning stored scores", session_id);
            return Ok(session);
        }

        let responses = self.store.get_responses(session_id, None).await?;
        let per_modality = score_session(&responses);
        let overall = aggregate(&per_modality);

        for (modality, result) in &per_modality {
            tracing::debug!(
                "Session {}: {} scored {} ({:?})",
                session_id,
                modality,
                result.score,
                result.confidence
            );
            record_modality_score(*modality, result.score);
        }

        let update = SessionUpdate {
            scores: Some(SessionScores::from_results(&per_modality, &overall)),
            completed_at: Some(Utc::now()),
        };
        let completed = self
            .store
            .update_session(session_id, update)
            .await?
            .ok_or_else(|| ServiceError::SessionNotFound(session_id.to_string()))?;

        // Record business metrics
        SESSIONS_TOTAL.with_label_values(&["completed"]).inc();
        SESSIONS_ACTIVE.dec();

        tracing::info!(
            "Session completed: {} with {} responses, overall={} ({:?})",
            session_id,
            responses.len(),
            overall.score,
            overall.confidence
        );

        Ok(completed)
    }

    /// Detailed breakdown for a completed session, derived from the stored
    /// responses by the same scorer that produced the stored scores.
    pub async fn get_results(&self, session_id: &str) -> Result<SessionResults, ServiceError> {
        let session = self.get_session(session_id).await?;
        let completed_at = session
            .completed_at
            .ok_or_else(|| ServiceError::SessionNotCompleted(session_id.to_string()))?;

        let responses = self.store.get_responses(session_id, None).await?;
        let modalities = score_session(&responses);
        let overall = aggregate(&modalities);
        let recommendations = recommend(&overall, &modalities);

        Ok(SessionResults {
            session_id: session.session_id,
            test_type: session.test_type,
            completed_at,
            modalities,
            overall,
            recommendations,
        })
    }

    pub async fn stats(&self) -> Result<TestStats, ServiceError> {
        Ok(self.store.stats().await?)
    }
}
