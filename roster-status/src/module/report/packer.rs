//! Packs display lines into chat-message sized blocks

use chrono::{DateTime, Utc};

use super::classifier::{date_token, BACKLOG_DAYS};

/// Per-message character limit of the chat platform
pub const MAX_MESSAGE_CHARS: usize = 2000;

pub const REPORT_TITLE: &str = "**Registration status**";

/// Opening text of the first block: title with the report date, then two
/// lines explaining the markup.
pub fn report_header(as_of: DateTime<Utc>) -> String {
    format!(
        "{} as of {}\n\
         Bold names are registered right now. Italic struck-through names have not started yet.\n\
         Struck-through names have ended; they are hidden {} days after they end.",
        REPORT_TITLE,
        date_token(as_of),
        BACKLOG_DAYS
    )
}

/// Greedily fill blocks in order. The header only opens the first block; an
/// overflowing line starts the next block on its own, trimmed.
pub fn pack_blocks(header: &str, lines: &[String]) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = header.to_string();
    let mut current_chars = current.chars().count();

    for line in lines {
        let line_chars = line.chars().count();
        if current_chars + 1 + line_chars < MAX_MESSAGE_CHARS {
            current.push('\n');
            current.push_str(line);
            current_chars += 1 + line_chars;
        } else {
            blocks.push(std::mem::take(&mut current));
            current = line.trim().to_string();
            current_chars = current.chars().count();
        }
    }
    blocks.push(current);

    blocks
}
