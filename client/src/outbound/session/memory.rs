//! Process-local session store.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::Session;
use crate::domain::ports::{SessionStore, SessionStoreError};

/// Session store that forgets everything when dropped.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    current: Mutex<Option<Session>>,
}

impl InMemorySessionStore {
    /// Store seeded with `session`.
    #[must_use]
    pub const fn with_session(session: Session) -> Self {
        Self {
            current: Mutex::new(Some(session)),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Session>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.slot().clone())
    }

    fn set(&self, session: &Session) -> Result<(), SessionStoreError> {
        *self.slot() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        *self.slot() = None;
        Ok(())
    }
}
