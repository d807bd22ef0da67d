//! Shared application state behind the HTTP surface.
//!
//! `CoreState` holds every live patient session keyed by id, plus the
//! nudge engine (immutable, shared by all sessions). Uses `RwLock` so
//! read-only requests (nudge feeds, summaries) run concurrently.
//!
//! The session map is bounded: sessions idle longer than the timeout are
//! evicted when a new one is created, and creation fails once the cap is
//! reached.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::config;
use crate::models::enums::DemoScenario;
use crate::nudges::NudgeEngine;
use crate::session::PatientSession;

struct SessionEntry {
    session: PatientSession,
    last_activity: Mutex<Instant>,
}

impl SessionEntry {
    fn new(session: PatientSession) -> Self {
        Self {
            session,
            last_activity: Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) -> Result<(), CoreError> {
        *self.last_activity.lock().map_err(|_| CoreError::LockPoisoned)? = Instant::now();
        Ok(())
    }

    fn idle_for(&self) -> Result<Duration, CoreError> {
        let last = self.last_activity.lock().map_err(|_| CoreError::LockPoisoned)?;
        Ok(last.elapsed())
    }
}

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    engine: NudgeEngine,
    max_sessions: usize,
    idle_timeout: Duration,
}

impl CoreState {
    pub fn new() -> Self {
        Self::with_engine(NudgeEngine::new())
    }

    pub fn with_engine(engine: NudgeEngine) -> Self {
        Self::with_limits(
            engine,
            config::MAX_SESSIONS,
            Duration::from_secs(config::SESSION_IDLE_TIMEOUT_SECS),
        )
    }

    pub fn with_limits(engine: NudgeEngine, max_sessions: usize, idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            engine,
            max_sessions,
            idle_timeout,
        }
    }

    pub fn engine(&self) -> &NudgeEngine {
        &self.engine
    }

    // ── Session lifecycle ───────────────────────────────────

    /// Register a session and return its id.
    ///
    /// Idle sessions are evicted first. Fails with `SessionLimit` if the
    /// store is still full afterwards.
    pub fn insert_session(&self, session: PatientSession) -> Result<Uuid, CoreError> {
        let mut sessions = self.sessions.write().map_err(|_| CoreError::LockPoisoned)?;
        self.evict_idle(&mut sessions)?;
        if sessions.len() >= self.max_sessions {
            tracing::warn!(limit = self.max_sessions, "Session limit reached");
            return Err(CoreError::SessionLimit(self.max_sessions));
        }

        let id = Uuid::new_v4();
        sessions.insert(id, SessionEntry::new(session));
        tracing::info!(session_id = %id, "Session created");
        Ok(id)
    }

    /// Start a session seeded with the demo dashboard state.
    pub fn create_session(&self) -> Result<Uuid, CoreError> {
        self.insert_session(PatientSession::seeded())
    }

    /// Start a session from a named demo preset.
    pub fn create_scenario_session(
        &self,
        scenario: DemoScenario,
        at: NaiveDateTime,
    ) -> Result<Uuid, CoreError> {
        let id = self.insert_session(PatientSession::from_scenario(scenario, at))?;
        tracing::debug!(session_id = %id, scenario = scenario.as_str(), "Scenario loaded");
        Ok(id)
    }

    pub fn remove_session(&self, id: Uuid) -> Result<(), CoreError> {
        self.sessions
            .write()
            .map_err(|_| CoreError::LockPoisoned)?
            .remove(&id)
            .map(|_| tracing::info!(session_id = %id, "Session closed"))
            .ok_or(CoreError::SessionNotFound(id))
    }

    pub fn session_count(&self) -> Result<usize, CoreError> {
        Ok(self.sessions.read().map_err(|_| CoreError::LockPoisoned)?.len())
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, SessionEntry>) -> Result<usize, CoreError> {
        let mut stale = Vec::new();
        for (id, entry) in sessions.iter() {
            if entry.idle_for()? >= self.idle_timeout {
                stale.push(*id);
            }
        }
        for id in &stale {
            sessions.remove(id);
            tracing::info!(session_id = %id, "Idle session evicted");
        }
        Ok(stale.len())
    }

    // ── Session access ──────────────────────────────────────

    /// Run `f` against a session under the read lock.
    pub fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&PatientSession) -> T,
    ) -> Result<T, CoreError> {
        let guard = self.sessions.read().map_err(|_| CoreError::LockPoisoned)?;
        let entry = guard.get(&id).ok_or(CoreError::SessionNotFound(id))?;
        entry.touch()?;
        Ok(f(&entry.session))
    }

    /// Run `f` against a session under the write lock.
    pub fn with_session_mut<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut PatientSession) -> T,
    ) -> Result<T, CoreError> {
        let mut guard = self.sessions.write().map_err(|_| CoreError::LockPoisoned)?;
        let entry = guard.get_mut(&id).ok_or(CoreError::SessionNotFound(id))?;
        entry.touch()?;
        Ok(f(&mut entry.session))
    }

    /// Dismiss one of the engine's nudge ids for a session.
    ///
    /// Returns false if it was already dismissed. Ids the engine never
    /// produces are rejected so the dismissed set stays bounded.
    pub fn dismiss_nudge(&self, id: Uuid, nudge_id: &str) -> Result<bool, CoreError> {
        let known = self.engine.rule_ids().any(|rule| rule == nudge_id);
        self.with_session_mut(id, |session| {
            if known {
                Ok(session.dismiss(nudge_id))
            } else {
                Err(CoreError::UnknownNudge(nudge_id.to_string()))
            }
        })?
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("Unknown nudge: {0}")]
    UnknownNudge(String),
    #[error("Session limit reached ({0} active)")]
    SessionLimit(usize),
}
