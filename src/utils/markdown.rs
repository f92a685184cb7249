//! Outbound message formatting.
//!
//! Replies use Telegram's legacy Markdown parse mode: the proverb in
//! bold, its meaning quoted in italics on the next line.

use crate::database::models::Proverb;

/// Renders a proverb as `*<proverb>*\n"_<meaning>_"`.
pub fn format_proverb(entry: &Proverb) -> String {
    format!("*{}*\n\"_{}_\"", entry.proverb, entry.meaning)
}
