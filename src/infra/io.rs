use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read blueprint text from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_text_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read file {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read blueprint from stdin")?;
            Ok(buf)
        }
    }
}
