//! Roster data types

use chrono::{DateTime, Utc};

/// One entrant row from the roster export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrantRecord {
    /// Display name, e.g. "Alice"
    pub name: String,
    /// Short tag from the second column
    pub tag: String,
    /// First valid day (midnight UTC)
    pub valid_from: DateTime<Utc>,
    /// Last valid day (midnight UTC)
    pub valid_until: DateTime<Utc>,
}

/// The sheet's own last-updated stamp, used as "now" for every comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportHeader {
    pub as_of: DateTime<Utc>,
}

/// A fully parsed roster export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub header: ReportHeader,
    /// Entrants in sheet order, blank rows removed
    pub entrants: Vec<EntrantRecord>,
}

impl Roster {
    /// Number of entrant rows in the export, including ones hidden from the report
    pub fn entrant_count(&self) -> usize {
        self.entrants.len()
    }
}
