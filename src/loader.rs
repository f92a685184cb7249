//! Bulk loading of proverbs from a line-oriented text file.
//!
//! One entry per line, `<proverb>:<meaning>`, split at the FIRST colon
//! with both sides trimmed. There is no escaping, so a colon inside the
//! proverb text itself mis-splits the line.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::database::models::NewProverb;

/// Parses one `<proverb>:<meaning>` line. Returns `None` for blank
/// lines and for lines with no colon separator.
pub fn parse_line(line: &str) -> Option<NewProverb> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (proverb, meaning) = line.split_once(':')?;
    Some(NewProverb::new(proverb.trim(), meaning.trim(), None))
}

/// Reads a UTF-8 proverb file, skipping malformed lines with a warning.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Vec<NewProverb>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut entries = Vec::new();
    for (lineno, line) in contents.lines().enumerate() {
        match parse_line(line) {
            Some(entry) => entries.push(entry),
            None => {
                if !line.trim().is_empty() {
                    warn!(
                        "{}:{}: no colon separator, line skipped",
                        path.display(),
                        lineno + 1
                    );
                }
            }
        }
    }
    Ok(entries)
}
