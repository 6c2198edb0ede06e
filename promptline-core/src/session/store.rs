//! Session id → conversation storage

use crate::protocol::Message;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Shared handle to one session's conversation. Holding the lock serializes
/// turns against that session.
pub type SessionHandle = Arc<Mutex<Vec<Message>>>;

/// Where session conversations live
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The session's conversation, created empty on first reference
    async fn session(&self, session_id: &str) -> SessionHandle;

    /// Snapshot of the session's conversation
    async fn history(&self, session_id: &str) -> Vec<Message> {
        let handle = self.session(session_id).await;
        let history = handle.lock().await;
        history.clone()
    }

    /// Append messages to the session's conversation
    async fn append(&self, session_id: &str, messages: Vec<Message>) {
        let handle = self.session(session_id).await;
        handle.lock().await.extend(messages);
    }
}

/// Process-lifetime session store; sessions are never evicted
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of every session created so far, sorted
    pub async fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn session(&self, session_id: &str) -> SessionHandle {
        if let Some(handle) = self.sessions.read().await.get(session_id) {
            return Arc::clone(handle);
        }

        let mut sessions = self.sessions.write().await;
        Arc::clone(
            sessions
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(Vec::new()))),
        )
    }
}
