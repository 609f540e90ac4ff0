//! Entrant status classification and line rendering

use chrono::{DateTime, Duration, Utc};

use crate::module::roster::{EntrantRecord, Roster};

/// Days an expired entry stays on the board before it is hidden
pub const BACKLOG_DAYS: i64 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrantStatus {
    /// Registration has not started yet
    Upcoming,
    /// Registration covers the report date
    Active,
    /// Registration ended within the backlog window
    Expired,
}

/// Classify a record against the report date. `None` means the record is too
/// stale to display.
pub fn classify(record: &EntrantRecord, as_of: DateTime<Utc>) -> Option<EntrantStatus> {
    let threshold = as_of - Duration::days(BACKLOG_DAYS);
    if record.valid_until < threshold {
        return None;
    }

    let status = if record.valid_from > as_of {
        EntrantStatus::Upcoming
    } else if record.valid_until > as_of {
        EntrantStatus::Active
    } else {
        EntrantStatus::Expired
    };
    Some(status)
}

/// Chat-side date placeholder, rendered by the client in the reader's locale.
pub fn date_token(at: DateTime<Utc>) -> String {
    format!("<t:{}:D>", at.timestamp())
}

/// Backslash-escape the characters the chat markup treats specially.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '~' | '*' | '`' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn render_line(record: &EntrantRecord, status: EntrantStatus) -> String {
    let name = escape_markdown(&record.name);
    match status {
        EntrantStatus::Upcoming => format!(
            "*~~{}~~* (begins {}) (valid through {})",
            name,
            date_token(record.valid_from),
            date_token(record.valid_until)
        ),
        EntrantStatus::Active => format!(
            "**{}** (valid through {})",
            name,
            date_token(record.valid_until)
        ),
        EntrantStatus::Expired => format!(
            "~~{}~~ (ended {})",
            name,
            date_token(record.valid_until)
        ),
    }
}

/// One line per displayable entrant, in sheet order.
pub fn display_lines(roster: &Roster) -> Vec<String> {
    let as_of = roster.header.as_of;
    let lines: Vec<String> = roster
        .entrants
        .iter()
        .filter_map(|record| classify(record, as_of).map(|status| render_line(record, status)))
        .collect();

    tracing::debug!(
        "{} of {} entrants displayed ({} hidden as stale)",
        lines.len(),
        roster.entrant_count(),
        roster.entrant_count() - lines.len()
    );
    lines
}
