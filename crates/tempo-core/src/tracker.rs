//! Session history ownership and the single-active-session invariant.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::session::{Session, SessionError};

/// Errors for tracker-level operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// An operation required a running session and none exists.
    #[error("no active session")]
    NoActiveSession,
    /// A delegated session transition failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Ordered history of sessions with at most one running at a time.
///
/// Sessions are appended in chronological start order and never removed.
/// The current session is tracked as an index into the owned history rather
/// than a reference, so ownership stays singular.
#[derive(Debug, Default)]
pub struct TaskTracker {
    sessions: Vec<Session>,
    current: Option<usize>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a new task at the current wall-clock time.
    pub fn start_task(&mut self, task_name: &str) -> Result<(), TrackerError> {
        self.start_task_at(task_name, Utc::now())
    }

    /// Starts tracking a new task at `now`.
    ///
    /// Switching tasks while one is active stops the previous session first;
    /// this is deliberate, not an error. The new session is started,
    /// appended to the history, and becomes current.
    pub fn start_task_at(
        &mut self,
        task_name: &str,
        now: DateTime<Utc>,
    ) -> Result<(), TrackerError> {
        // Validate the name before touching the running session, so a bad
        // name leaves the tracker unchanged.
        let mut session = Session::new(task_name)?;

        if let Some(index) = self.current {
            self.sessions[index].stop_at(now)?;
            self.current = None;
        }

        session.start_at(now)?;
        self.sessions.push(session);
        self.current = Some(self.sessions.len() - 1);

        tracing::debug!(task = task_name, "started task");
        Ok(())
    }

    /// Pauses the current session at the current wall-clock time.
    pub fn pause_current(&mut self) -> Result<(), TrackerError> {
        self.pause_current_at(Utc::now())
    }

    /// Pauses the current session at `now`.
    pub fn pause_current_at(&mut self, now: DateTime<Utc>) -> Result<(), TrackerError> {
        let index = self.current.ok_or(TrackerError::NoActiveSession)?;
        self.sessions[index].pause_at(now)?;
        Ok(())
    }

    /// Resumes the current session at the current wall-clock time.
    pub fn resume_current(&mut self) -> Result<(), TrackerError> {
        self.resume_current_at(Utc::now())
    }

    /// Resumes the current session at `now`.
    pub fn resume_current_at(&mut self, now: DateTime<Utc>) -> Result<(), TrackerError> {
        let index = self.current.ok_or(TrackerError::NoActiveSession)?;
        self.sessions[index].resume_at(now)?;
        Ok(())
    }

    /// Stops the current session at the current wall-clock time.
    pub fn stop_all(&mut self) -> Result<(), TrackerError> {
        self.stop_all_at(Utc::now())
    }

    /// Stops the current session at `now` and clears the current pointer.
    ///
    /// Postcondition: no session in the history is running.
    pub fn stop_all_at(&mut self, now: DateTime<Utc>) -> Result<(), TrackerError> {
        let index = self.current.ok_or(TrackerError::NoActiveSession)?;
        self.sessions[index].stop_at(now)?;
        self.current = None;

        debug_assert!(self.sessions.iter().all(|s| !s.is_running()));
        tracing::debug!("stopped tracking");
        Ok(())
    }

    /// The full ordered session history.
    ///
    /// The returned slice is immutable; callers cannot mutate tracker-owned
    /// state through it.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// The currently tracked session, if any.
    pub fn current_session(&self) -> Option<&Session> {
        self.current.map(|index| &self.sessions[index])
    }

    /// Whether a session is actively running (and not paused).
    ///
    /// Drives the UI refresh tick: the elapsed display only updates while
    /// this returns true.
    pub fn current_session_is_running(&self) -> bool {
        self.current_session()
            .is_some_and(|s| s.is_running() && !s.is_paused())
    }
}
