use std::sync::Arc;

use super::{ServiceError, SessionLocks};
use crate::metrics::{record_response_rejected, record_response_submitted};
use crate::models::{Modality, ResponseRecord, SubmitResponseRequest};
use crate::store::SessionStore;

pub struct ResponseService {
    store: Arc<dyn SessionStore>,
    locks: Arc<SessionLocks>,
    max_response_time_ms: u64,
}

impl ResponseService {
    pub fn new(
        store: Arc<dyn SessionStore>,
        locks: Arc<SessionLocks>,
        max_response_time_ms: u64,
    ) -> Self {
        Self {
            store,
            locks,
            max_response_time_ms,
        }
    }

    pub async fn submit_response(
        &self,
        session_id: &str,
        req: SubmitResponseRequest,
    ) -> Result<ResponseRecord, ServiceError> {
        if self.store.get_session(session_id).await?.is_none() {
            return Err(ServiceError::SessionNotFound(session_id.to_string()));
        }
        let _guard = self.locks.acquire(session_id).await;

        let session = self
            .store
            .get_session(session_id)
            .await?
            .ok_or_else(|| ServiceError::SessionNotFound(session_id.to_string()))?;

        if session.is_completed() {
            return Err(ServiceError::SessionCompleted(session_id.to_string()));
        }

        let modality = req.modality;
        if !session.test_type.includes(modality) {
            record_response_rejected(modality);
            return Err(ServiceError::InvalidResponse(format!(
                "{} is not part of a {:?} session",
                modality, session.test_type
            )));
        }

        let new_response = req
            .into_new_response(session_id, self.max_response_time_ms)
            .map_err(|e| {
                record_response_rejected(modality);
                ServiceError::InvalidResponse(e.to_string())
            })?;

        let record = self.store.add_response(new_response).await?;
        record_response_submitted(modality);

        tracing::debug!(
            "Response stored: session={}, modality={}, stimulus={}, attempt={}",
            session_id,
            record.modality,
            record.stimulus,
            record.attempt
        );

        Ok(record)
    }

    pub async fn list_responses(
        &self,
        session_id: &str,
        modality: Option<Modality>,
    ) -> Result<Vec<ResponseRecord>, ServiceError> {
        if self.store.get_session(session_id).await?.is_none() {
            return Err(ServiceError::SessionNotFound(session_id.to_string()));
        }
        Ok(self.store.get_responses(session_id, modality).await?)
    }
}
