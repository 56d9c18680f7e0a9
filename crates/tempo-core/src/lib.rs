//! Core domain logic for the tempo task timer.
//!
//! This crate contains the fundamental types and logic for:
//! - Session: one timed interval with pause/resume bookkeeping
//! - `TaskTracker`: the session history and single-active-session invariant
//! - Rollup: aggregating sessions into per-category totals
//! - Fallback: the deterministic local classifier used when the external
//!   classification call fails

pub mod category;
mod fallback;
mod rollup;
pub mod session;
pub mod tracker;

pub use category::{Category, CategorySet};
pub use fallback::fallback_categories;
pub use rollup::{CategoryRollup, TaskRollup, aggregate, aggregate_at, format_clock, parse_clock};
pub use session::{Session, SessionError};
pub use tracker::{TaskTracker, TrackerError};
