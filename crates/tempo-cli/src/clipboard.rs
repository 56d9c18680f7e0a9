//! Clipboard export.

use anyhow::{Context, Result};

/// Places the given text on the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("failed to open clipboard")?;
    clipboard
        .set_text(text.to_string())
        .context("failed to write to clipboard")?;
    tracing::debug!(bytes = text.len(), "copied report to clipboard");
    Ok(())
}
