//! Category rollup: aggregating session durations into named groups.
//!
//! The rollup is transient and recomputed on demand; nothing here is
//! persisted. Totals are tracked in whole seconds (integer truncation, no
//! rounding) to match the formatted output.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::category::CategorySet;
use crate::session::Session;

/// Aggregated time for one task name within a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRollup {
    pub name: String,
    pub total_seconds: i64,
    /// `H:MM:SS` rendering of `total_seconds`.
    pub total_time: String,
}

/// Aggregated time for one category, with a per-task breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRollup {
    pub name: String,
    pub total_seconds: i64,
    /// `H:MM:SS` rendering of `total_seconds`.
    pub total_time: String,
    pub tasks: Vec<TaskRollup>,
}

/// Rolls the session history up into per-category, per-task totals, using
/// the current wall-clock time for still-running sessions.
pub fn aggregate(sessions: &[Session], categories: &CategorySet) -> Vec<CategoryRollup> {
    aggregate_at(sessions, categories, Utc::now())
}

/// Rolls the session history up into per-category, per-task totals as of
/// `now`.
///
/// A task name listed in multiple categories resolves to the last-listed
/// category. Sessions whose task name has no category are skipped: the
/// classifier contract places every task into a catch-all upstream, so the
/// aggregator never invents one. Categories and tasks appear in first-seen
/// order over the session scan, not definition order. Empty sessions or an
/// empty definition yield an empty result.
pub fn aggregate_at(
    sessions: &[Session],
    categories: &CategorySet,
    now: DateTime<Utc>,
) -> Vec<CategoryRollup> {
    if sessions.is_empty() || categories.is_empty() {
        return Vec::new();
    }

    // Later definitions overwrite earlier ones: last-listed category wins.
    let mut task_to_category: HashMap<&str, &str> = HashMap::new();
    for category in &categories.categories {
        for task in &category.tasks {
            task_to_category.insert(task.as_str(), category.name.as_str());
        }
    }

    struct Accumulator {
        total_seconds: i64,
        task_order: Vec<String>,
        task_seconds: HashMap<String, i64>,
    }

    let mut order: Vec<&str> = Vec::new();
    let mut by_category: HashMap<&str, Accumulator> = HashMap::new();

    for session in sessions {
        let Some(&category_name) = task_to_category.get(session.task_name()) else {
            continue;
        };

        let seconds = match session.duration_at(now) {
            Ok(duration) => duration.num_seconds(),
            Err(err) => {
                tracing::warn!(task = session.task_name(), error = %err, "skipping session with unusable duration");
                continue;
            }
        };

        let entry = by_category.entry(category_name).or_insert_with(|| {
            order.push(category_name);
            Accumulator {
                total_seconds: 0,
                task_order: Vec::new(),
                task_seconds: HashMap::new(),
            }
        });

        entry.total_seconds += seconds;
        let task_name = session.task_name();
        if !entry.task_seconds.contains_key(task_name) {
            entry.task_order.push(task_name.to_string());
        }
        *entry.task_seconds.entry(task_name.to_string()).or_insert(0) += seconds;
    }

    order
        .into_iter()
        .filter_map(|name| {
            let acc = by_category.remove(name)?;
            let tasks = acc
                .task_order
                .into_iter()
                .map(|task| {
                    let seconds = acc.task_seconds[&task];
                    TaskRollup {
                        name: task,
                        total_seconds: seconds,
                        total_time: format_clock(seconds),
                    }
                })
                .collect();
            Some(CategoryRollup {
                name: name.to_string(),
                total_seconds: acc.total_seconds,
                total_time: format_clock(acc.total_seconds),
                tasks,
            })
        })
        .collect()
}

/// Formats whole seconds as `H:MM:SS` (hours unpadded).
///
/// Negative inputs should never reach this point; they are clamped to zero
/// so a defect upstream cannot produce garbled output.
pub fn format_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let remaining = seconds % 60;
    format!("{hours}:{minutes:02}:{remaining:02}")
}

/// Parses an `H:MM:SS` string back into whole seconds.
///
/// The inverse of [`format_clock`] for valid inputs.
pub fn parse_clock(value: &str) -> Option<i64> {
    let mut parts = value.splitn(3, ':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: i64 = parts.next()?.parse().ok()?;
    if !(0..60).contains(&minutes) || !(0..60).contains(&seconds) || hours < 0 {
        return None;
    }
    Some(hours * 3600 + minutes * 60 + seconds)
}
