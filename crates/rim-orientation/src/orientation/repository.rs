use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::domain::ProfileCode;
use super::session::{QuizSession, SessionId};

/// Storage abstraction for in-progress sessions. Implementations hand out
/// owned copies so no two callers mutate the same score map.
pub trait SessionStore: Send + Sync {
    fn insert(&self, session: QuizSession) -> Result<(), SessionStoreError>;
    /// Replaces the stored session. Fails with `Stale` when the stored
    /// revision no longer matches `session.revision()`, and bumps the
    /// revision on success.
    fn update(&self, session: QuizSession) -> Result<(), SessionStoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<QuizSession>, SessionStoreError>;
    fn remove(&self, id: &SessionId) -> Result<(), SessionStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session changed since it was read; retry the request")]
    Stale,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook recording one final profile per completed session.
pub trait ResultSink: Send + Sync {
    fn persist_result(&self, result: &CompletedResult) -> Result<(), ResultSinkError>;
}

/// Row written when a respondent finishes the quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedResult {
    pub session_id: SessionId,
    pub profile: ProfileCode,
    pub recorded_at: DateTime<Utc>,
}

impl CompletedResult {
    pub fn new(session_id: SessionId, profile: ProfileCode) -> Self {
        Self {
            session_id,
            profile,
            recorded_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResultSinkError {
    #[error("failed to write result: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode result: {0}")]
    Csv(#[from] csv::Error),
    #[error("result sink unavailable: {0}")]
    Unavailable(String),
}

/// How long an untouched session survives in [`InMemorySessionStore`].
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug, Clone)]
struct StoredSession {
    session: QuizSession,
    touched: Instant,
}

/// Process-local session store. A session lives until it is removed or until
/// it has gone untouched for the idle timeout; idle sessions are evicted on
/// the next insert or fetch.
#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, StoredSession>>>,
    idle_timeout: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_IDLE_TIMEOUT)
    }
}

impl InMemorySessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn len(&self) -> usize {
        self.lock().map(|guard| guard.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<SessionId, StoredSession>>, SessionStoreError>
    {
        self.sessions
            .lock()
            .map_err(|_| SessionStoreError::Unavailable("session mutex poisoned".to_string()))
    }

    fn evict_idle(&self, sessions: &mut HashMap<SessionId, StoredSession>) {
        let before = sessions.len();
        sessions.retain(|_, stored| stored.touched.elapsed() < self.idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "evicted idle quiz sessions");
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, session: QuizSession) -> Result<(), SessionStoreError> {
        let mut guard = self.lock()?;
        self.evict_idle(&mut guard);
        if guard.contains_key(session.id()) {
            return Err(SessionStoreError::Conflict);
        }
        guard.insert(
            session.id().clone(),
            StoredSession {
                session,
                touched: Instant::now(),
            },
        );
        Ok(())
    }

    fn update(&self, mut session: QuizSession) -> Result<(), SessionStoreError> {
        let mut guard = self.lock()?;
        let stored = guard
            .get_mut(session.id())
            .ok_or(SessionStoreError::NotFound)?;
        if stored.session.revision() != session.revision() {
            return Err(SessionStoreError::Stale);
        }

        session.set_revision(session.revision().wrapping_add(1));
        stored.session = session;
        stored.touched = Instant::now();
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<QuizSession>, SessionStoreError> {
        let mut guard = self.lock()?;
        self.evict_idle(&mut guard);
        Ok(guard.get_mut(id).map(|stored| {
            stored.touched = Instant::now();
            stored.session.clone()
        }))
    }

    fn remove(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        self.lock()?
            .remove(id)
            .map(|_| ())
            .ok_or(SessionStoreError::NotFound)
    }
}

/// Keeps completed results in memory; the default when no results file is
/// configured.
#[derive(Default, Clone)]
pub struct InMemoryResultSink {
    results: Arc<Mutex<Vec<CompletedResult>>>,
}

impl InMemoryResultSink {
    pub fn results(&self) -> Vec<CompletedResult> {
        self.results
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl ResultSink for InMemoryResultSink {
    fn persist_result(&self, result: &CompletedResult) -> Result<(), ResultSinkError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|_| ResultSinkError::Unavailable("result mutex poisoned".to_string()))?;
        guard.push(result.clone());
        Ok(())
    }
}
