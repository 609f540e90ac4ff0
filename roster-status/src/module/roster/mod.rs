//! Roster export module
//!
//! Fetches the tab-separated roster export and parses it into
//! a report header and entrant records.

pub mod types;
pub mod parser;
pub mod fetcher;

pub use fetcher::{HttpRosterFetcher, RosterSource};
pub use parser::{parse_date, parse_roster};
pub use types::{EntrantRecord, ReportHeader, Roster};
