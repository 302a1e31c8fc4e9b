use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::cli::AppContext;

/// Copy `content` to the system clipboard.
pub fn copy_to_clipboard(content: &str, ctx: &AppContext) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Failed to access clipboard")?;

    clipboard
        .set_text(content.to_string())
        .context("Failed to copy to clipboard")?;

    if !ctx.quiet {
        if ctx.no_color {
            eprintln!("Copied to clipboard");
        } else {
            eprintln!("{} Copied to clipboard", "✓".green());
        }
    }
    Ok(())
}
