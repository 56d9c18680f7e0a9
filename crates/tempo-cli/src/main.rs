use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tempo_cli::app::{App, build_runtime};
use tempo_cli::{Cli, Config};

/// Builds the Gemini client from config, unless disabled.
fn build_classifier(cli: &Cli, config: &Config) -> Option<tempo_llm::Client> {
    if cli.no_classifier {
        tracing::debug!("classifier disabled by flag");
        return None;
    }
    let Some(api_key) = &config.api_key else {
        tracing::debug!("no API key configured, using local classifier");
        return None;
    };
    match tempo_llm::Client::with_timeout(
        api_key.clone(),
        Duration::from_secs(config.classify_timeout_secs),
    ) {
        Ok(client) => Some(client),
        Err(err) => {
            tracing::warn!(error = %err, "classifier unavailable, using local fallback");
            None
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let classifier = build_classifier(&cli, &config);
    let app = App::new(config, classifier);

    let runtime = build_runtime()?;
    runtime.block_on(app.run())
}
