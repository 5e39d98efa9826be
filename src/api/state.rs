use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::models::{LoadingState, Session, SessionError};
use crate::oracle::Oracle;

/// In-memory sessions, keyed by id. Nothing is persisted.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
}

/// Why a store update did not happen.
#[derive(Debug)]
pub enum UpdateError {
    NotFound,
    Rejected(SessionError),
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> Session {
        let session = Session::new();
        let mut sessions = self.sessions.lock().expect("session store lock poisoned");
        sessions.insert(session.id(), session.clone());
        session
    }

    pub fn get(&self, id: Uuid) -> Option<Session> {
        let sessions = self.sessions.lock().expect("session store lock poisoned");
        sessions.get(&id).cloned()
    }

    /// Apply one transition atomically. The lock is held only for the
    /// transition itself, so callers must not await inside `f`.
    pub fn update<F>(&self, id: Uuid, f: F) -> Result<Session, UpdateError>
    where
        F: FnOnce(&Session) -> Result<Session, SessionError>,
    {
        let mut sessions = self.sessions.lock().expect("session store lock poisoned");
        let current = sessions.get(&id).ok_or(UpdateError::NotFound)?;
        let next = f(current).map_err(UpdateError::Rejected)?;
        sessions.insert(id, next.clone());
        Ok(next)
    }

    /// Remove a settled or idle session. A session with a reading in flight
    /// is kept so its settle step has somewhere to land.
    pub fn remove(&self, id: Uuid) -> Result<Session, UpdateError> {
        let mut sessions = self.sessions.lock().expect("session store lock poisoned");
        let current = sessions.get(&id).ok_or(UpdateError::NotFound)?;
        if current.state() == LoadingState::Loading {
            return Err(UpdateError::Rejected(SessionError::AlreadyLoading));
        }
        sessions.remove(&id).ok_or(UpdateError::NotFound)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub oracle: Oracle,
}

impl AppState {
    pub fn new(oracle: Oracle) -> Self {
        Self {
            sessions: SessionStore::new(),
            oracle,
        }
    }
}
