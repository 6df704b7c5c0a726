//! ChatSession — server-held, append-only histories.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::models::conversation::ConversationTurn;

#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    turns: Vec<ConversationTurn>,
}

impl ChatSession {
    fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            created_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Appends the user message and the reply it produced, in that order.
    pub fn record_turn(&mut self, message: String, reply: String) {
        self.turns.push(ConversationTurn::user(message));
        self.turns.push(ConversationTurn::assistant(reply));
    }
}

pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Sessions live for the lifetime of the process only, capped at `max_sessions`.
/// Creating a session past the cap evicts the oldest one.
///
/// Each session sits behind its own async mutex: turns within a session run
/// one at a time, different sessions run concurrently.
pub struct SessionStore {
    inner: RwLock<Sessions>,
    max_sessions: usize,
}

#[derive(Default)]
struct Sessions {
    by_id: HashMap<Uuid, Arc<Mutex<ChatSession>>>,
    /// Creation order, oldest first.
    order: VecDeque<Uuid>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            inner: RwLock::new(Sessions::default()),
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn create(&self) -> ChatSession {
        let session = ChatSession::new();
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        while inner.order.len() >= self.max_sessions {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.by_id.remove(&oldest);
            debug!("Evicted chat session {oldest}");
        }

        inner.order.push_back(session.session_id);
        inner
            .by_id
            .insert(session.session_id, Arc::new(Mutex::new(session.clone())));
        session
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Mutex<ChatSession>>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_id
            .get(&id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_id
            .len()
    }
}
