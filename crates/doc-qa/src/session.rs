//! Per-user session state: the current index and the chat transcript
//!
//! A [`Session`] is an ordinary value owned by whoever drives the assistant. The CLI keeps
//! one on the stack; the HTTP server keeps many in a [`SessionStore`], each behind its own
//! async mutex so events for one session run one at a time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::retrieval::VectorIndex;
use crate::types::{ChatTranscript, ChatTurn, DocumentInfo};

/// One document index and the conversation about it
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    index: Option<VectorIndex>,
    transcript: ChatTranscript,
    document: Option<DocumentInfo>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Empty session: no index, empty transcript
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            index: None,
            transcript: ChatTranscript::new(),
            document: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Index of the current document, if one was uploaded
    pub fn index(&self) -> Option<&VectorIndex> {
        self.index.as_ref()
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    pub fn document(&self) -> Option<&DocumentInfo> {
        self.document.as_ref()
    }

    /// Swap in a freshly indexed document
    ///
    /// The previous index is dropped and the transcript restarts with the summary turn.
    pub fn replace_document(&mut self, index: VectorIndex, document: DocumentInfo, summary: String) {
        tracing::info!(
            "Session {} now indexes {} ({} chunks)",
            self.id,
            document.filename,
            index.len()
        );
        self.index = Some(index);
        self.document = Some(document);
        self.transcript.clear();
        self.transcript.push(ChatTurn::summary(summary));
    }

    /// Record an answered question
    pub fn record_turn(&mut self, turn: ChatTurn) {
        self.transcript.push(turn);
    }
}

struct StoredSession {
    session: Arc<Mutex<Session>>,
    last_used: parking_lot::Mutex<Instant>,
}

impl StoredSession {
    fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            last_used: parking_lot::Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.last_used.lock() = Instant::now();
    }

    fn last_used(&self) -> Instant {
        *self.last_used.lock()
    }

    /// True while a request holds a handle to the session
    fn in_use(&self) -> bool {
        Arc::strong_count(&self.session) > 1
    }
}

/// Concurrent map of live sessions, bounded in size
///
/// Each session holds a whole document index, so the store keeps at most `max_sessions`
/// of them and evicts the least recently used one to make room. Idle sessions are also
/// dropped by [`SessionStore::evict_idle`], which the server runs on a timer.
pub struct SessionStore {
    sessions: DashMap<Uuid, StoredSession>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Create an empty session and return its ID
    pub fn create(&self) -> Uuid {
        while self.sessions.len() >= self.max_sessions {
            if !self.evict_least_recent() {
                break;
            }
        }

        let session = Session::new();
        let id = session.id();
        self.sessions.insert(id, StoredSession::new(session));
        tracing::debug!("Created session {}", id);
        id
    }

    /// Handle to a session; lock it for the duration of one event
    pub fn get(&self, id: Uuid) -> Result<Arc<Mutex<Session>>> {
        self.sessions
            .get(&id)
            .map(|entry| {
                entry.touch();
                Arc::clone(&entry.session)
            })
            .ok_or(Error::SessionNotFound(id))
    }

    /// Drop a session and everything it holds
    pub fn remove(&self, id: Uuid) -> Result<()> {
        self.sessions
            .remove(&id)
            .map(|_| tracing::debug!("Removed session {}", id))
            .ok_or(Error::SessionNotFound(id))
    }

    /// Drop sessions unused for at least `ttl`; returns how many were dropped
    ///
    /// Sessions with a request in flight are kept regardless of age.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let mut evicted = 0;
        self.sessions.retain(|id, entry| {
            let idle = entry.last_used().elapsed() >= ttl && !entry.in_use();
            if idle {
                tracing::debug!("Session {} expired", id);
                evicted += 1;
            }
            !idle
        });
        evicted
    }

    fn evict_least_recent(&self) -> bool {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|entry| entry.value().last_used())
            .map(|entry| *entry.key());

        match oldest {
            Some(id) => {
                tracing::info!(
                    "Session limit of {} reached, evicting session {}",
                    self.max_sessions,
                    id
                );
                self.sessions.remove(&id).is_some()
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
