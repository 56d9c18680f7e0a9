//! Markdown summary rendering.
//!
//! The rendered report is the tool's only export artifact. It lists every
//! session with its start/end timestamps, appends the category rollup when
//! one is available, and closes with the grand total.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use tempo_core::{CategoryRollup, Session};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders the session history and category rollup as a markdown report.
///
/// Still-running sessions show `in progress` in place of an end timestamp
/// and contribute their elapsed time as of `now`.
pub fn render_report(
    sessions: &[Session],
    rollups: &[CategoryRollup],
    now: DateTime<Utc>,
) -> String {
    let mut out = String::from("# Task Summary\n");

    if sessions.is_empty() {
        out.push_str("\nNo tasks recorded.\n");
        return out;
    }

    out.push_str("\n## Tasks\n\n");
    let mut total_seconds = 0;
    for session in sessions {
        let seconds = match session.duration_at(now) {
            Ok(duration) => duration.num_seconds(),
            Err(err) => {
                tracing::warn!(task = session.task_name(), error = %err, "rendering session with zero duration");
                0
            }
        };
        total_seconds += seconds;

        let start = session
            .start_time()
            .map_or_else(|| "-".to_string(), |t| t.format(TIMESTAMP_FORMAT).to_string());
        let end = session.end_time().map_or_else(
            || "in progress".to_string(),
            |t| t.format(TIMESTAMP_FORMAT).to_string(),
        );

        let _ = writeln!(out, "- **{}**: {}", session.task_name(), padded_clock(seconds));
        let _ = writeln!(out, "  - Start: {start}");
        let _ = writeln!(out, "  - End: {end}");
    }

    if !rollups.is_empty() {
        out.push_str("\n## Categories\n\n");
        for rollup in rollups {
            let plural = if rollup.tasks.len() == 1 { "" } else { "s" };
            let _ = writeln!(
                out,
                "- **{}**: {} ({} task{plural})",
                rollup.name,
                rollup.total_time,
                rollup.tasks.len()
            );
            for task in &rollup.tasks {
                let _ = writeln!(out, "  - {}: {}", task.name, task.total_time);
            }
        }
    }

    let _ = write!(out, "\n## Total Time: {}\n", padded_clock(total_seconds));
    out
}

/// Formats whole seconds as zero-padded `HH:MM:SS`.
fn padded_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let remaining = seconds % 60;
    format!("{hours:02}:{minutes:02}:{remaining:02}")
}
