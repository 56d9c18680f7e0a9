//! Interactive command loop.
//!
//! Runs on a current-thread runtime: a `select!` over stdin lines and a
//! one-second tick that redraws the elapsed-time line while a session is
//! actively running. All state lives in memory and is dropped on exit.

use std::io::Write as _;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use tempo_core::{CategorySet, TaskTracker, aggregate_at, fallback_categories, format_clock};
use tempo_llm::Client;

use crate::{Config, clipboard, report};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Start(String),
    Pause,
    Resume,
    Stop,
    Status,
    Summary,
    Copy,
    Help,
    Quit,
}

impl Command {
    /// Parses an input line. `Ok(None)` for a blank line; `Err` carries the
    /// message to show the user.
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let command = match word {
            "start" => {
                if rest.is_empty() {
                    return Err("usage: start <task name>".to_string());
                }
                return Ok(Some(Self::Start(rest.to_string())));
            }
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "stop" => Self::Stop,
            "status" => Self::Status,
            "summary" => Self::Summary,
            "copy" => Self::Copy,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command: {other} (try `help`)")),
        };

        if rest.is_empty() {
            Ok(Some(command))
        } else {
            Err(format!("`{word}` takes no arguments"))
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Builds the single-threaded runtime the loop runs on.
///
/// The IO driver must be enabled even though the loop itself only reads
/// stdin and ticks: classification requests are driven on this runtime too.
pub fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")
}

/// Interactive application state.
pub struct App {
    tracker: TaskTracker,
    config: Config,
    classifier: Option<Client>,
}

impl App {
    pub fn new(config: Config, classifier: Option<Client>) -> Self {
        Self {
            tracker: TaskTracker::new(),
            config,
            classifier,
        }
    }

    /// Runs the read-eval loop until `quit` or end of input.
    pub async fn run(mut self) -> Result<()> {
        println!("tempo - type `help` for commands");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut tick = tokio::time::interval(Duration::from_secs(1));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("failed to read input")? else {
                        break;
                    };
                    if self.handle_line(&line).await == Flow::Quit {
                        break;
                    }
                }
                // The tick only fires while a session is running unpaused,
                // so an idle tracker costs nothing to display.
                _ = tick.tick(), if self.tracker.current_session_is_running() => {
                    self.print_elapsed();
                }
            }
        }
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> Flow {
        match Command::parse(line) {
            Ok(Some(command)) => self.handle_command(command).await,
            Ok(None) => Flow::Continue,
            Err(message) => {
                println!("{message}");
                Flow::Continue
            }
        }
    }

    /// Executes one command. Precondition violations from the tracker print
    /// a one-line error and leave state unchanged.
    async fn handle_command(&mut self, command: Command) -> Flow {
        match command {
            Command::Start(name) => match self.tracker.start_task(&name) {
                Ok(()) => println!("started: {name}"),
                Err(err) => println!("error: {err}"),
            },
            Command::Pause => match self.tracker.pause_current() {
                Ok(()) => println!("paused"),
                Err(err) => println!("error: {err}"),
            },
            Command::Resume => match self.tracker.resume_current() {
                Ok(()) => println!("resumed"),
                Err(err) => println!("error: {err}"),
            },
            Command::Stop => match self.tracker.stop_all() {
                Ok(()) => println!("stopped"),
                Err(err) => println!("error: {err}"),
            },
            Command::Status => self.print_status(),
            Command::Summary => {
                let report = self.render_summary().await;
                println!("{report}");
            }
            Command::Copy => {
                let report = self.render_summary().await;
                match clipboard::copy_to_clipboard(&report) {
                    Ok(()) => println!("copied to clipboard"),
                    Err(err) => println!("error: {err:#}"),
                }
            }
            Command::Help => print_help(),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Classifies the distinct task names and renders the markdown report.
    async fn render_summary(&self) -> String {
        let now = Utc::now();
        let tasks = self.distinct_tasks();
        let categories = self.classify(&tasks).await;
        let rollups = aggregate_at(self.tracker.sessions(), &categories, now);
        report::render_report(self.tracker.sessions(), &rollups, now)
    }

    /// Gemini when configured, deterministic local fallback otherwise or on
    /// any classification error. Never fails and never touches tracker state.
    async fn classify(&self, tasks: &[String]) -> CategorySet {
        if tasks.is_empty() {
            return CategorySet::default();
        }
        if let Some(client) = &self.classifier {
            match client.categorize_tasks(&self.config.model, tasks).await {
                Ok(categories) => {
                    tracing::debug!(
                        categories = categories.categories.len(),
                        "classified via API"
                    );
                    return categories;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "classification failed, using local fallback");
                }
            }
        }
        fallback_categories(tasks, &self.config.catch_all)
    }

    /// Distinct task names in first-seen order over the history.
    fn distinct_tasks(&self) -> Vec<String> {
        let mut tasks: Vec<String> = Vec::new();
        for session in self.tracker.sessions() {
            if !tasks.iter().any(|t| t == session.task_name()) {
                tasks.push(session.task_name().to_string());
            }
        }
        tasks
    }

    fn print_status(&self) {
        match self.tracker.current_session() {
            Some(session) => {
                let state = if session.is_paused() { "paused" } else { "running" };
                let elapsed = session
                    .duration()
                    .map_or_else(|err| err.to_string(), |d| format_clock(d.num_seconds()));
                println!("{}: {state}, {elapsed} elapsed", session.task_name());
            }
            None => println!("no active task"),
        }
    }

    /// Redraws the elapsed-time line in place.
    fn print_elapsed(&self) {
        if let Some(session) = self.tracker.current_session() {
            if let Ok(duration) = session.duration() {
                print!(
                    "\r{}: {} ",
                    session.task_name(),
                    format_clock(duration.num_seconds())
                );
                let _ = std::io::stdout().flush();
            }
        }
    }
}

fn print_help() {
    println!("commands:");
    println!("  start <task name>  start tracking a task (stops the current one)");
    println!("  pause              pause the current task");
    println!("  resume             resume the paused task");
    println!("  stop               stop the current task");
    println!("  status             show the current task and elapsed time");
    println!("  summary            print the markdown summary");
    println!("  copy               copy the markdown summary to the clipboard");
    println!("  quit               exit (state is not persisted)");
}
