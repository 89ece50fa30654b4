//! Knowledge entries: one recorded decision, lesson, or similar item.
//!
//! Entries originate from Markdown blocks headed by
//! `## [YYYY-MM-DD-HHMMSS] Title`. The header is split into a
//! [`EntryHeader`]; the block's lines (header included) form the body.

use chrono::NaiveDate;
use serde::Serialize;

/// Line prefix that marks an entry as obsolete.
pub const SUPERSEDED_MARKER: &str = "~~Superseded";

/// Date format used in entry headers.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parsed metadata from an entry header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryHeader {
    /// Full timestamp (`YYYY-MM-DD-HHMMSS`), used for ordering and uniqueness
    pub timestamp: String,

    /// Date part (`YYYY-MM-DD`) exactly as written in the header
    pub date: String,

    /// Entry title
    pub title: String,
}

impl EntryHeader {
    pub fn new(
        timestamp: impl Into<String>,
        date: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            date: date.into(),
            title: title.into(),
        }
    }
}

/// A single knowledge entry: header metadata plus its lines.
///
/// The `superseded` flag is computed once at construction from the body
/// text, so scoring never has to inspect prose again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeEntry {
    /// Parsed header metadata
    pub header: EntryHeader,

    /// All lines of the entry, header line first
    pub lines: Vec<String>,

    superseded: bool,
}

impl KnowledgeEntry {
    /// Build an entry, detecting the superseded marker in `lines`.
    pub fn new(header: EntryHeader, lines: Vec<String>) -> Self {
        let superseded = lines
            .iter()
            .any(|line| line.trim().starts_with(SUPERSEDED_MARKER));
        Self {
            header,
            lines,
            superseded,
        }
    }

    /// Override the superseded flag (for producers that track it out of band).
    pub fn with_superseded(mut self, superseded: bool) -> Self {
        self.superseded = superseded;
        self
    }

    /// Entry title.
    pub fn title(&self) -> &str {
        &self.header.title
    }

    /// Calendar date from the header, or `None` if it does not parse.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.header.date, DATE_FORMAT).ok()
    }

    /// Whether a later entry has marked this one obsolete.
    pub fn is_superseded(&self) -> bool {
        self.superseded
    }

    /// The full entry text, lines joined with `\n`.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }
}
