//! Entry block rendering and parsing for section files
//!
//! A section file opens with a level-1 header and holds a sequence of entry
//! blocks:
//!
//! ```text
//! # Backend Project - Errors Archives
//!
//! ## DB Timeout
//!
//! *Added on: 2026-08-22 10:30:00*
//!
//! connection pool exhausted under load
//!
//! ---
//!
//! ```

use chrono::NaiveDateTime;

/// Timestamp format used in the "Added on" annotation
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ENTRY_HEADING: &str = "## ";
const ADDED_PREFIX: &str = "*Added on: ";
const ADDED_SUFFIX: &str = "*";
const SEPARATOR: &str = "---";

/// One entry parsed out of a section file
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub title: String,
    pub body: String,
    /// Timestamp from the annotation, when present and parseable
    pub added: Option<NaiveDateTime>,
}

/// Render the level-1 header that opens a fresh section file
pub fn render_header(project: &str, section: &str) -> String {
    format!(
        "# {} Project - {} Archives\n\n",
        capitalize(project),
        capitalize(section)
    )
}

/// Render one entry block ready to append to a section file
pub fn render_block(title: &str, content: &str, added: NaiveDateTime) -> String {
    format!(
        "## {}\n\n{}{}{}\n\n{}\n\n{}\n\n",
        title,
        ADDED_PREFIX,
        added.format(TIMESTAMP_FORMAT),
        ADDED_SUFFIX,
        content.trim_end(),
        SEPARATOR
    )
}

/// Split section-file content into entries on level-2 heading boundaries.
///
/// The file-level `# ` header is not an entry. The annotation line and the
/// trailing separator are stripped from entry bodies.
pub fn parse_entries(content: &str) -> Vec<Entry> {
    let mut entries = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in content.lines() {
        if let Some(title) = line.strip_prefix(ENTRY_HEADING) {
            if let Some((title, lines)) = current.take() {
                entries.push(finish_entry(title, &lines));
            }
            current = Some((title.trim().to_string(), Vec::new()));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }

    if let Some((title, lines)) = current.take() {
        entries.push(finish_entry(title, &lines));
    }

    entries
}

fn finish_entry(title: String, lines: &[&str]) -> Entry {
    let mut added = None;
    let mut annotation_taken = false;
    let mut body_lines: Vec<&str> = Vec::new();

    for line in lines {
        let trimmed = line.trim();
        if !annotation_taken && body_lines.iter().all(|l| l.trim().is_empty()) {
            if let Some(ts) = trimmed
                .strip_prefix(ADDED_PREFIX)
                .and_then(|rest| rest.strip_suffix(ADDED_SUFFIX))
            {
                annotation_taken = true;
                added = NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).ok();
                continue;
            }
        }
        body_lines.push(line);
    }

    // Strip the trailing separator and surrounding blank lines
    while let Some(last) = body_lines.last() {
        let trimmed = last.trim();
        if trimmed.is_empty() || trimmed == SEPARATOR {
            body_lines.pop();
        } else {
            break;
        }
    }
    let start = body_lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(body_lines.len());

    Entry {
        title,
        body: body_lines[start..].join("\n"),
        added,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
