//! Session lifecycle: one timed interval of work on a single task name.
//!
//! A session moves `Idle -> Running -> (Paused <-> Running) -> Stopped`, where
//! `Stopped` is terminal. Pause spans are accumulated separately so that
//! [`Session::duration_at`] reports only actively worked time.

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

/// Precondition and invariant violations for session transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The task name was empty or whitespace-only.
    #[error("task name cannot be empty")]
    EmptyTaskName,
    /// `start` was called on a session that is already running.
    #[error("session is already running")]
    AlreadyRunning,
    /// A transition required a running session.
    #[error("session is not running")]
    NotRunning,
    /// `pause` was called on a session that is already paused.
    #[error("session is already paused")]
    AlreadyPaused,
    /// `resume` was called on a session that is not paused.
    #[error("session is not paused")]
    NotPaused,
    /// `duration` was queried before the session was started.
    #[error("session has not been started")]
    NotStarted,
    /// The computed duration was negative. This indicates a defect in the
    /// caller's timestamps, not a recoverable condition.
    #[error("computed duration is negative ({0} seconds)")]
    NegativeDuration(i64),
}

/// A timed interval for one task name, with pause/resume bookkeeping.
///
/// Every transition has a wall-clock convenience method (`start`, `pause`,
/// ...) and an explicit `*_at(now)` variant. The `*_at` variants are the
/// real implementation; they make the arithmetic deterministic for tests and
/// for callers that batch transitions at a single observed instant.
#[derive(Debug, Clone)]
pub struct Session {
    task_name: String,
    is_running: bool,
    is_paused: bool,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    pause_start_time: Option<DateTime<Utc>>,
    paused_time: TimeDelta,
}

impl Session {
    /// Creates an idle session for the given task name.
    ///
    /// The name is trimmed; an empty result is rejected.
    pub fn new(task_name: &str) -> Result<Self, SessionError> {
        let task_name = task_name.trim();
        if task_name.is_empty() {
            return Err(SessionError::EmptyTaskName);
        }
        Ok(Self {
            task_name: task_name.to_string(),
            is_running: false,
            is_paused: false,
            start_time: None,
            end_time: None,
            pause_start_time: None,
            paused_time: TimeDelta::zero(),
        })
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    pub const fn is_running(&self) -> bool {
        self.is_running
    }

    pub const fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub const fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Total suspended time accumulated by completed pause spans.
    pub const fn paused_time(&self) -> TimeDelta {
        self.paused_time
    }

    /// Starts the session at the current wall-clock time.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.start_at(Utc::now())
    }

    /// Starts the session at `now`. Fails if already running or stopped.
    pub fn start_at(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.is_running {
            return Err(SessionError::AlreadyRunning);
        }
        if self.end_time.is_some() {
            // Stopped is terminal; a session is never restarted.
            return Err(SessionError::AlreadyRunning);
        }
        self.is_running = true;
        self.start_time = Some(now);
        Ok(())
    }

    /// Pauses the running session at the current wall-clock time.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        self.pause_at(Utc::now())
    }

    /// Pauses the running session at `now`.
    pub fn pause_at(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if !self.is_running {
            return Err(SessionError::NotRunning);
        }
        if self.is_paused {
            return Err(SessionError::AlreadyPaused);
        }
        self.is_paused = true;
        self.pause_start_time = Some(now);
        Ok(())
    }

    /// Resumes the paused session at the current wall-clock time.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        self.resume_at(Utc::now())
    }

    /// Resumes the paused session at `now`, folding the completed pause span
    /// into the accumulated paused time.
    pub fn resume_at(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if !self.is_running {
            return Err(SessionError::NotRunning);
        }
        if !self.is_paused {
            return Err(SessionError::NotPaused);
        }
        let pause_start = self.pause_start_time.ok_or(SessionError::NotPaused)?;
        self.paused_time += now - pause_start;
        self.is_paused = false;
        self.pause_start_time = None;
        Ok(())
    }

    /// Stops the session at the current wall-clock time.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        self.stop_at(Utc::now())
    }

    /// Stops the session at `now`, entering the terminal state.
    ///
    /// A paused session is implicitly resumed first so the pause span up to
    /// the stop moment is excluded from the duration. Stopping a session
    /// that never ran, or stopping twice, fails and leaves state unchanged.
    pub fn stop_at(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if !self.is_running {
            return Err(SessionError::NotRunning);
        }
        if self.is_paused {
            self.resume_at(now)?;
        }
        self.is_running = false;
        self.end_time = Some(now);
        Ok(())
    }

    /// Worked duration as of the current wall-clock time.
    pub fn duration(&self) -> Result<TimeDelta, SessionError> {
        self.duration_at(Utc::now())
    }

    /// Worked duration as of `now`: `(end_or_now - start) - paused`.
    ///
    /// Callable in any state after `start`. An in-progress pause span counts
    /// toward the subtraction, so time spent paused never inflates the
    /// duration even before `resume` is called.
    pub fn duration_at(&self, now: DateTime<Utc>) -> Result<TimeDelta, SessionError> {
        let start = self.start_time.ok_or(SessionError::NotStarted)?;
        let end = self.end_time.unwrap_or(now);

        let mut paused = self.paused_time;
        if self.is_paused {
            if let Some(pause_start) = self.pause_start_time {
                paused += now - pause_start;
            }
        }

        let duration = (end - start) - paused;
        if duration < TimeDelta::zero() {
            return Err(SessionError::NegativeDuration(duration.num_seconds()));
        }
        Ok(duration)
    }
}
