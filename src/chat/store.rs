use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use uuid::Uuid;

use crate::chat::models::{ChatMessage, Session, SessionSummary};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Session {0} not found")]
    NotFound(Uuid),
    #[error("A message is already being sent in session {0}")]
    Busy(Uuid),
}

#[derive(Default)]
struct Sessions {
    order: Vec<Uuid>,
    by_id: HashMap<Uuid, Session>,
}

/// In-memory conversation list keyed by session id.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<Sessions>>,
    greeting: Arc<str>,
}

impl SessionStore {
    pub fn new(greeting: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Sessions::default())),
            greeting: Arc::from(greeting),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sessions> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn create(&self) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            title: String::new(),
            messages: vec![ChatMessage::assistant(self.greeting.as_ref())],
            created_at: Utc::now(),
            sending: false,
        };

        let mut sessions = self.lock();
        sessions.order.push(session.id);
        sessions.by_id.insert(session.id, session.clone());
        session
    }

    pub fn get(&self, id: Uuid) -> Option<Session> {
        self.lock().by_id.get(&id).cloned()
    }

    pub fn list(&self) -> Vec<SessionSummary> {
        let sessions = self.lock();
        sessions
            .order
            .iter()
            .filter_map(|id| sessions.by_id.get(id))
            .map(Session::summary)
            .collect()
    }

    pub fn append(&self, id: Uuid, message: ChatMessage) -> Result<(), StoreError> {
        let mut sessions = self.lock();
        let session = sessions.by_id.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        session.messages.push(message);
        Ok(())
    }

    pub fn rename_once(&self, id: Uuid, title: &str) -> Result<bool, StoreError> {
        let mut sessions = self.lock();
        let session = sessions.by_id.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if !session.title.is_empty() {
            return Ok(false);
        }
        session.title = title.to_string();
        Ok(true)
    }

    /// Marks the session as sending. The flag clears when the guard drops.
    pub fn begin_send(&self, id: Uuid) -> Result<SendGuard, StoreError> {
        let mut sessions = self.lock();
        let session = sessions.by_id.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if session.sending {
            return Err(StoreError::Busy(id));
        }
        session.sending = true;
        Ok(SendGuard {
            store: self.clone(),
            id,
        })
    }
}

pub struct SendGuard {
    store: SessionStore,
    id: Uuid,
}

impl Drop for SendGuard {
    fn drop(&mut self) {
        if let Some(session) = self.store.lock().by_id.get_mut(&self.id) {
            session.sending = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::models::Role;

    #[test]
    fn new_session_is_seeded_and_untitled() {
        let store = SessionStore::new("hello");
        let session = store.create();

        assert!(session.title.is_empty());
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].role, Role::Assistant);
        assert_eq!(session.messages[0].content, "hello");
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn list_keeps_creation_order() {
        let store = SessionStore::new("hi");
        let a = store.create();
        let b = store.create();
        let c = store.create();

        let ids: Vec<Uuid> = store.list().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn rename_applies_only_once() {
        let store = SessionStore::new("hi");
        let session = store.create();

        assert_eq!(store.rename_once(session.id, "First topic"), Ok(true));
        assert_eq!(store.rename_once(session.id, "Second topic"), Ok(false));
        assert_eq!(store.get(session.id).unwrap().title, "First topic");
    }

    #[test]
    fn unknown_session_is_reported() {
        let store = SessionStore::new("hi");
        let missing = Uuid::new_v4();
        assert_eq!(
            store.append(missing, ChatMessage::assistant("x")),
            Err(StoreError::NotFound(missing))
        );
        assert!(store.get(missing).is_none());
    }

    #[test]
    fn only_one_send_at_a_time() {
        let store = SessionStore::new("hi");
        let session = store.create();

        let guard = store.begin_send(session.id).unwrap();
        assert!(store.get(session.id).unwrap().sending);
        assert!(matches!(store.begin_send(session.id), Err(StoreError::Busy(_))));

        drop(guard);
        assert!(!store.get(session.id).unwrap().sending);
        assert!(store.begin_send(session.id).is_ok());
    }
}
