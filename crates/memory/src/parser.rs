//! Markdown knowledge-file parsing.
//!
//! Context files are plain Markdown. Decisions and learnings are sequences
//! of timestamped entry blocks:
//!
//! ```text
//! ## [2026-02-19-143000] Use SQLite for the index
//!
//! **Context**: ...
//! ```
//!
//! Tasks, conventions and constitution rules are bullet lists.

use ctxpack_core::{EntryHeader, KnowledgeEntry};
use regex_lite::Regex;
use std::sync::LazyLock;

/// `## [YYYY-MM-DD-HHMMSS] Title`
static ENTRY_HEADER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^## \[(\d{4}-\d{2}-\d{2})-(\d{6})\] (.+)$").ok()
});

const UNCHECKED: &str = "- [ ]";
const CHECKED: &[&str] = &["- [x]", "- [X]"];

/// Parse a header line into its timestamp, date and title.
pub fn parse_entry_header(line: &str) -> Option<EntryHeader> {
    let re = ENTRY_HEADER.as_ref()?;
    let caps = re.captures(line.trim_end())?;
    let date = caps.get(1)?.as_str();
    let time = caps.get(2)?.as_str();
    let title = caps.get(3)?.as_str().trim();
    Some(EntryHeader::new(format!("{date}-{time}"), date, title))
}

/// Split content into entry blocks.
///
/// Each block starts at a header line and runs until the next header or
/// the end of the content, with trailing blank lines trimmed. Text before
/// the first header is ignored.
pub fn parse_entry_blocks(content: &str) -> Vec<KnowledgeEntry> {
    let lines: Vec<&str> = content.lines().collect();
    let headers: Vec<(usize, EntryHeader)> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| parse_entry_header(line).map(|h| (i, h)))
        .collect();

    let mut blocks = Vec::with_capacity(headers.len());
    for (n, (start, header)) in headers.iter().enumerate() {
        let mut end = headers.get(n + 1).map_or(lines.len(), |(next, _)| *next);
        while end > start + 1 && lines[end - 1].trim().is_empty() {
            end -= 1;
        }
        let body = lines[*start..end].iter().map(|l| l.to_string()).collect();
        blocks.push(KnowledgeEntry::new(header.clone(), body));
    }
    blocks
}

/// Unchecked checkbox lines, trimmed, marker included.
pub fn active_tasks(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(UNCHECKED))
        .map(str::to_string)
        .collect()
}

/// Constitution rules: checkbox items and plain bullets, marker stripped.
pub fn constitution_rules(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if is_checkbox(line) {
                checkbox_text(line)
            } else {
                bullet_text(line)
            }
        })
        .collect()
}

/// Bullet items (`- ` or `* `), marker stripped.
pub fn bullet_items(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| bullet_text(line.trim()))
        .collect()
}

fn is_checkbox(line: &str) -> bool {
    line.starts_with(UNCHECKED) || CHECKED.iter().any(|m| line.starts_with(m))
}

fn checkbox_text(line: &str) -> Option<String> {
    std::iter::once(UNCHECKED)
        .chain(CHECKED.iter().copied())
        .find_map(|marker| line.strip_prefix(marker))
        .map(|rest| rest.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn bullet_text(line: &str) -> Option<String> {
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
