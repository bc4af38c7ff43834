use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;

use crate::config::Config;
use crate::store::{MemoryStore, SessionStore, StoreError};

pub mod response_service;
pub mod session_service;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn SessionStore>,
    pub locks: Arc<SessionLocks>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn SessionStore>) -> Self {
        tracing::info!("Using {} session store", store.backend_name());
        Self {
            config,
            store,
            locks: Arc::new(SessionLocks::default()),
        }
    }

    /// State backed by a fresh volatile store.
    pub fn in_memory(config: Config) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session {0} is already completed")]
    SessionCompleted(String),

    #[error("Session {0} is not completed yet")]
    SessionNotCompleted(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One async mutex per session id.
///
/// Response submission and completion both run under the session's lock, so
/// completion reads a response set that cannot change until scores are
/// written. An entry lives only while some task holds or waits for it.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SessionLocks {
    pub async fn acquire(&self, session_id: &str) -> SessionGuard<'_> {
        let lock = {
            let mut locks = self.registry();
            locks.entry(session_id.to_string()).or_default().clone()
        };
        SessionGuard {
            locks: self,
            session_id: session_id.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<String, Arc<tokio::sync::Mutex<()>>>> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.registry().len()
    }
}

/// Held for the duration of a per-session critical section.
pub struct SessionGuard<'a> {
    locks: &'a SessionLocks,
    session_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        // Release the session mutex first so its Arc count drops.
        self.guard.take();

        let mut locks = self.locks.registry();
        // Only the registry's own handle left: nobody holds or awaits it.
        if locks
            .get(&self.session_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.session_id);
        }
    }
}
