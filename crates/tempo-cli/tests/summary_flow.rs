//! Integration tests for the complete summary flow.
//!
//! Drives the full pipeline with fixed timestamps: tracker transitions ->
//! local classification -> category rollup -> markdown report.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use tempo_cli::report::render_report;
use tempo_core::{TaskTracker, aggregate_at, fallback_categories};

fn ts(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0)
        .single()
        .expect("valid test timestamp")
        + TimeDelta::seconds(seconds)
}

fn distinct_tasks(tracker: &TaskTracker) -> Vec<String> {
    let mut tasks: Vec<String> = Vec::new();
    for session in tracker.sessions() {
        if !tasks.iter().any(|t| t == session.task_name()) {
            tasks.push(session.task_name().to_string());
        }
    }
    tasks
}

#[test]
fn tracked_day_rolls_up_into_the_report() {
    let mut tracker = TaskTracker::new();

    // 30 minutes of ProjA-dev with a 10-minute pause in the middle.
    tracker.start_task_at("ProjA-dev", ts(0)).unwrap();
    tracker.pause_current_at(ts(600)).unwrap();
    tracker.resume_current_at(ts(1200)).unwrap();

    // Switching tasks stops ProjA-dev at the 40-minute mark (30 worked).
    tracker.start_task_at("ProjA-meeting", ts(2400)).unwrap();
    tracker.start_task_at("lunch", ts(3300)).unwrap();
    tracker.stop_all_at(ts(3600)).unwrap();

    let now = ts(3600);
    let tasks = distinct_tasks(&tracker);
    let categories = fallback_categories(&tasks, "Other");
    assert!(categories.covers_exactly(&tasks));

    let rollups = aggregate_at(tracker.sessions(), &categories, now);
    let report = render_report(tracker.sessions(), &rollups, now);

    insta::assert_snapshot!(report, @r"
    # Task Summary

    ## Tasks

    - **ProjA-dev**: 00:30:00
      - Start: 2025-06-02 09:00:00
      - End: 2025-06-02 09:40:00
    - **ProjA-meeting**: 00:15:00
      - Start: 2025-06-02 09:40:00
      - End: 2025-06-02 09:55:00
    - **lunch**: 00:05:00
      - Start: 2025-06-02 09:55:00
      - End: 2025-06-02 10:00:00

    ## Categories

    - **ProjA**: 0:45:00 (2 tasks)
      - ProjA-dev: 0:30:00
      - ProjA-meeting: 0:15:00
    - **Other**: 0:05:00 (1 task)
      - lunch: 0:05:00

    ## Total Time: 00:50:00
    ");
}

#[test]
fn running_session_appears_in_progress_with_live_elapsed() {
    let mut tracker = TaskTracker::new();
    tracker.start_task_at("ProjB-review", ts(0)).unwrap();

    let now = ts(125);
    let tasks = distinct_tasks(&tracker);
    let categories = fallback_categories(&tasks, "Other");
    let rollups = aggregate_at(tracker.sessions(), &categories, now);
    let report = render_report(tracker.sessions(), &rollups, now);

    assert!(report.contains("- **ProjB-review**: 00:02:05"));
    assert!(report.contains("  - End: in progress"));
    assert!(report.contains("- **ProjB**: 0:02:05 (1 task)"));
    assert!(report.contains("## Total Time: 00:02:05"));
}

#[test]
fn empty_tracker_renders_the_placeholder() {
    let tracker = TaskTracker::new();
    let tasks = distinct_tasks(&tracker);
    let categories = fallback_categories(&tasks, "Other");
    let rollups = aggregate_at(tracker.sessions(), &categories, ts(0));

    let report = render_report(tracker.sessions(), &rollups, ts(0));
    assert_eq!(report, "# Task Summary\n\nNo tasks recorded.\n");
}

#[test]
fn repeated_fallback_classification_is_stable() {
    let mut tracker = TaskTracker::new();
    tracker.start_task_at("ProjA-dev", ts(0)).unwrap();
    tracker.start_task_at("[Infra] deploy", ts(60)).unwrap();
    tracker.start_task_at("reading", ts(120)).unwrap();
    tracker.stop_all_at(ts(180)).unwrap();

    let tasks = distinct_tasks(&tracker);
    let first = fallback_categories(&tasks, "Other");
    let second = fallback_categories(&tasks, "Other");
    assert_eq!(first, second);

    let now = ts(180);
    assert_eq!(
        render_report(tracker.sessions(), &aggregate_at(tracker.sessions(), &first, now), now),
        render_report(tracker.sessions(), &aggregate_at(tracker.sessions(), &second, now), now),
    );
}
