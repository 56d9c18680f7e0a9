//! Task timer CLI library.
//!
//! This crate provides the interactive terminal interface for the task timer.

pub mod app;
mod cli;
pub mod clipboard;
mod config;
pub mod report;

pub use cli::Cli;
pub use config::Config;
