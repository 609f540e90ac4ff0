//! Roster export parser
//!
//! Layout of the tab-separated export:
//!   line 1  free-form banner, ignored
//!   line 2  column 9 holds the "last updated" date
//!   line 3+ name, tag, valid-from, valid-until, then anything
//!
//! The export is unquoted: a `"` inside a cell is part of its text. Rows may
//! end in `\n` or `\r\n`. All dates are DD/MM/YYYY and read as midnight UTC.

use chrono::{DateTime, NaiveDate, Utc};
use csv::StringRecord;
use tracing::debug;

use super::types::{EntrantRecord, ReportHeader, Roster};
use crate::error::{ReportError, Result};

const DATE_FORMAT: &str = "%d/%m/%Y";
const AS_OF_COLUMN: usize = 8;
const HEADER_LINE: usize = 2;

/// Parse a `DD/MM/YYYY` date as midnight UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_date_at(value: &str, line: usize) -> Result<DateTime<Utc>> {
    parse_date(value).ok_or_else(|| ReportError::MalformedDate {
        line,
        value: value.trim().to_string(),
    })
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("").trim()
}

/// 1-based line the record starts on
fn line_of(record: &StringRecord, fallback: usize) -> usize {
    record
        .position()
        .map_or(fallback, |position| position.line() as usize)
}

/// Parse the whole export into a [`Roster`].
///
/// Fails on the first date that cannot be read; nothing is published from a
/// half-understood sheet.
pub fn parse_roster(text: &str) -> Result<Roster> {
    // `\r` stays in the last cell and is trimmed away with the rest of the
    // whitespace, so CRLF and LF exports count lines the same way.
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .has_headers(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    // Banner row
    records.next().transpose()?;

    let as_of = match records.next().transpose()? {
        Some(header) => parse_date_at(
            field(&header, AS_OF_COLUMN),
            line_of(&header, HEADER_LINE),
        )?,
        None => parse_date_at("", HEADER_LINE)?,
    };

    let mut entrants = Vec::new();
    for result in records {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let line = line_of(&record, 0);

        entrants.push(EntrantRecord {
            name: field(&record, 0).to_string(),
            tag: field(&record, 1).to_string(),
            valid_from: parse_date_at(field(&record, 2), line)?,
            valid_until: parse_date_at(field(&record, 3), line)?,
        });
    }

    debug!("Parsed roster as of {}: {} entrants", as_of, entrants.len());

    Ok(Roster {
        header: ReportHeader { as_of },
        entrants,
    })
}
