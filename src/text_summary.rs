//! Text listing builder for CLI output.
//!
//! Formats the stored list for `--list`, one `<id>: <cmd>` line per entry.

use crate::model::CommandList;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build the listing; ids are right-aligned to the widest one.
pub(crate) fn build_text_summary(list: &CommandList) -> TextSummary {
    let width = list
        .len()
        .saturating_sub(1)
        .to_string()
        .len()
        .max(2);
    let lines = list
        .entries()
        .iter()
        .map(|e| {
            if e.command.is_empty() {
                format!("{:>width$}:", e.position)
            } else {
                format!("{:>width$}: {}", e.position, e.command)
            }
        })
        .collect();
    TextSummary { lines }
}
