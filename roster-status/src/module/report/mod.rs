//! Report rendering: per-entrant status lines packed into message blocks.

pub mod classifier;
pub mod packer;

pub use classifier::{classify, display_lines, escape_markdown, render_line, EntrantStatus};
pub use packer::{pack_blocks, report_header, MAX_MESSAGE_CHARS};

use crate::module::roster::Roster;

/// Render a parsed roster into the ordered message blocks to publish.
pub fn render_report(roster: &Roster) -> Vec<String> {
    let lines = display_lines(roster);
    pack_blocks(&report_header(roster.header.as_of), &lines)
}
